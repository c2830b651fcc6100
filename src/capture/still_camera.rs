//! File-backed virtual camera.
//!
//! Each facing mode is bound to one image on disk. Acquiring a stream decodes that image once
//! and serves it as the live frame until the stream is released.

use std::{
    collections::BTreeSet,
    io::Cursor,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::{
    assets::decode::decode_upright,
    capture::source::{
        CAPTURE_JPEG_QUALITY, DeviceError, ImageSource, PickedFile, StillImage,
        StreamConstraints, read_picked_file,
    },
    foundation::{
        core::Facing,
        error::{CardError, CardResult},
    },
};

/// Live stream handed out by [`StillFrameCamera`].
pub struct FrameStream {
    id: u64,
    facing: Facing,
    frame: image::DynamicImage,
}

impl FrameStream {
    /// Facing mode the stream was opened for.
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Negotiated stream resolution.
    pub fn resolution(&self) -> (u32, u32) {
        (self.frame.width(), self.frame.height())
    }
}

impl std::fmt::Debug for FrameStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStream")
            .field("id", &self.id)
            .field("facing", &self.facing)
            .field("resolution", &self.resolution())
            .finish()
    }
}

/// Virtual camera serving a still image per facing mode.
#[derive(Debug, Default)]
pub struct StillFrameCamera {
    front: Option<PathBuf>,
    back: Option<PathBuf>,
    active: BTreeSet<u64>,
    next_id: u64,
}

impl StillFrameCamera {
    /// Camera with no devices; every acquisition fails with `NotFound`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the user-facing camera to an image file.
    pub fn with_front(mut self, path: impl Into<PathBuf>) -> Self {
        self.front = Some(path.into());
        self
    }

    /// Bind the environment-facing camera to an image file.
    pub fn with_back(mut self, path: impl Into<PathBuf>) -> Self {
        self.back = Some(path.into());
        self
    }

    /// Number of streams acquired and not yet released.
    pub fn active_tracks(&self) -> usize {
        self.active.len()
    }

    fn device_path(&self, facing: Facing) -> Option<&Path> {
        match facing {
            Facing::Front => self.front.as_deref(),
            Facing::Back => self.back.as_deref(),
        }
    }
}

fn open_frame(path: &Path) -> Result<image::DynamicImage, DeviceError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DeviceError::NotFound,
        std::io::ErrorKind::PermissionDenied => DeviceError::Denied,
        _ => DeviceError::Unavailable(format!("read '{}': {e}", path.display())),
    })?;
    decode_upright(&bytes)
        .map_err(|e| DeviceError::Unavailable(format!("decode '{}': {e}", path.display())))
}

/// Shrink `frame` to fit inside the ideal resolution, preserving aspect.
fn negotiate(frame: image::DynamicImage, constraints: StreamConstraints) -> image::DynamicImage {
    let (w, h) = (frame.width(), frame.height());
    if w <= constraints.ideal_width && h <= constraints.ideal_height {
        return frame;
    }
    // `resize` keeps aspect and fits within the box.
    frame.resize(
        constraints.ideal_width,
        constraints.ideal_height,
        image::imageops::FilterType::Lanczos3,
    )
}

impl ImageSource for StillFrameCamera {
    type Stream = FrameStream;

    #[tracing::instrument(skip(self))]
    async fn acquire_camera_stream(
        &mut self,
        facing: Facing,
        constraints: StreamConstraints,
    ) -> Result<FrameStream, DeviceError> {
        let path = self.device_path(facing).ok_or(DeviceError::NotFound)?;
        let frame = negotiate(open_frame(path)?, constraints);

        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(id);
        debug!(
            id,
            width = frame.width(),
            height = frame.height(),
            "camera stream acquired"
        );
        Ok(FrameStream { id, facing, frame })
    }

    fn release_stream(&mut self, stream: FrameStream) {
        if self.active.remove(&stream.id) {
            debug!(id = stream.id, facing = %stream.facing, "camera stream released");
        } else {
            warn!(id = stream.id, "released a stream this camera does not own");
        }
    }

    async fn capture_frame(&mut self, stream: &FrameStream) -> CardResult<StillImage> {
        if !self.active.contains(&stream.id) {
            return Err(CardError::DeviceUnavailable(format!(
                "stream {} is not active",
                stream.id
            )));
        }

        let rgb = stream.frame.to_rgb8();
        let (width, height) = rgb.dimensions();
        let mut buf = Vec::new();
        image::codecs::jpeg::JpegEncoder::new_with_quality(
            &mut Cursor::new(&mut buf),
            CAPTURE_JPEG_QUALITY,
        )
        .encode_image(&rgb)
        .map_err(|e| CardError::DeviceUnavailable(format!("encode captured frame: {e}")))?;

        Ok(StillImage::new(buf, "image/jpeg", width, height))
    }

    async fn read_file(&mut self, file: &PickedFile) -> CardResult<StillImage> {
        read_picked_file(file)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/still_camera.rs"]
mod tests;
