use std::io::Cursor;

use image::{ImageDecoder as _, metadata::Orientation};

use crate::{
    capture::source::StillImage,
    foundation::{
        core::Dimensions,
        error::{CardError, CardResult},
    },
};

/// Photo pixels ready for compositing.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedPhoto {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, `width * height * 4` bytes.
    pub rgba8_premul: Vec<u8>,
}

impl DecodedPhoto {
    /// Wrap premultiplied pixels.
    pub fn new(width: u32, height: u32, rgba8_premul: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba8_premul,
        }
    }

    /// Pixel size.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

impl std::fmt::Debug for DecodedPhoto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedPhoto")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Decode a still to intrinsic-size premultiplied pixels.
///
/// Completes before anything is drawn; a failure aborts the render.
#[tracing::instrument(skip(still), fields(media_type = still.media_type(), bytes = still.data().len()))]
pub async fn decode_still(still: &StillImage) -> CardResult<DecodedPhoto> {
    decode_image(still.data())
}

/// Synchronous decode of encoded image bytes, EXIF orientation applied.
pub fn decode_image(bytes: &[u8]) -> CardResult<DecodedPhoto> {
    let rgba = decode_upright(bytes)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CardError::photo_decode("image has zero area"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);
    Ok(DecodedPhoto::new(width, height, rgba8_premul))
}

/// Decode to an [`image::DynamicImage`] rotated and flipped per its EXIF orientation.
pub fn decode_upright(bytes: &[u8]) -> CardResult<image::DynamicImage> {
    let (decoder, orientation) = open_decoder(bytes)?;
    let mut img = image::DynamicImage::from_decoder(decoder)
        .map_err(|e| CardError::photo_decode(e.to_string()))?;
    img.apply_orientation(orientation);
    Ok(img)
}

/// Upright pixel size read from the header, without decoding pixels.
///
/// Quarter-turn EXIF orientations swap width and height, matching what [`decode_image`]
/// produces.
pub fn probe_dimensions(bytes: &[u8]) -> CardResult<Dimensions> {
    let (decoder, orientation) = open_decoder(bytes)?;
    let (width, height) = decoder.dimensions();
    let (width, height) = if swaps_axes(orientation) {
        (height, width)
    } else {
        (width, height)
    };
    if width == 0 || height == 0 {
        return Err(CardError::photo_decode("image has zero area"));
    }
    Ok(Dimensions { width, height })
}

fn open_decoder(bytes: &[u8]) -> CardResult<(impl image::ImageDecoder + '_, Orientation)> {
    let mut decoder = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CardError::photo_decode(format!("guess image format: {e}")))?
        .into_decoder()
        .map_err(|e| CardError::photo_decode(format!("read image header: {e}")))?;
    // Unreadable EXIF is ignored, the same way browsers draw such files.
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    Ok((decoder, orientation))
}

fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

/// Straight alpha to premultiplied, rounding to nearest.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

/// Premultiplied to straight alpha. Fully transparent pixels become transparent black.
pub fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        match a {
            255 => {}
            0 => px[..3].fill(0),
            _ => {
                for c in &mut px[..3] {
                    *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
