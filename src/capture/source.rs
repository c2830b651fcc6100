use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    assets::decode::probe_dimensions,
    foundation::{
        core::{Dimensions, Facing},
        error::{CardError, CardResult},
    },
};

/// JPEG quality used for frames snapshotted from a live stream.
pub const CAPTURE_JPEG_QUALITY: u8 = 80;

/// Preferred stream resolution requested from a camera.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StreamConstraints {
    /// Ideal frame width in pixels.
    pub ideal_width: u32,
    /// Ideal frame height in pixels.
    pub ideal_height: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// Why a camera stream could not be acquired.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Permission was refused.
    #[error("permission denied")]
    Denied,
    /// No device for the requested facing mode.
    #[error("no camera for the requested facing mode")]
    NotFound,
    /// The device exists but could not be opened or read.
    #[error("{0}")]
    Unavailable(String),
}

impl From<DeviceError> for CardError {
    fn from(err: DeviceError) -> Self {
        match err {
            DeviceError::Denied => CardError::DeviceDenied("permission denied".to_string()),
            DeviceError::NotFound => CardError::DeviceNotFound("no matching device".to_string()),
            DeviceError::Unavailable(reason) => CardError::DeviceUnavailable(reason),
        }
    }
}

/// An encoded still image plus its intrinsic size. Never mutated after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct StillImage {
    data: Arc<[u8]>,
    media_type: String,
    width: u32,
    height: u32,
}

impl StillImage {
    /// Assemble a still from parts the caller already trusts.
    pub fn new(
        data: impl Into<Arc<[u8]>>,
        media_type: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            data: data.into(),
            media_type: media_type.into(),
            width,
            height,
        }
    }

    /// Probe the encoded header for upright dimensions (EXIF orientation applied).
    pub fn from_encoded(data: impl Into<Arc<[u8]>>, media_type: impl Into<String>) -> CardResult<Self> {
        let data: Arc<[u8]> = data.into();
        let size = probe_dimensions(&data)?;
        Ok(Self::new(data, media_type, size.width, size.height))
    }

    /// Encoded bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Declared media type, e.g. `image/jpeg`.
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Intrinsic pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Intrinsic size.
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.width,
            height: self.height,
        }
    }
}

impl std::fmt::Debug for StillImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StillImage")
            .field("media_type", &self.media_type)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A file the user picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedFile {
    /// File name as shown to the user.
    pub name: String,
    /// Declared media type.
    pub media_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Wrap in-memory contents.
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk. The media type is guessed from the extension.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read picked file '{}'", path.display()))?;
        let media_type = image::ImageFormat::from_path(path)
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            media_type,
            bytes,
        })
    }
}

/// Platform boundary that yields still images, either from a live camera or a picked file.
///
/// A stream handle holds an exclusive device resource until it is passed back to
/// [`ImageSource::release_stream`]. Release consumes the handle, so it happens at most once.
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    /// Live stream handle.
    type Stream;

    /// Open a stream for `facing` at roughly the requested resolution.
    async fn acquire_camera_stream(
        &mut self,
        facing: Facing,
        constraints: StreamConstraints,
    ) -> Result<Self::Stream, DeviceError>;

    /// Stop all tracks of `stream`.
    fn release_stream(&mut self, stream: Self::Stream);

    /// Snapshot the current frame at the stream's native size.
    async fn capture_frame(&mut self, stream: &Self::Stream) -> CardResult<StillImage>;

    /// Turn a picked file into a still. Non-image media types are rejected.
    async fn read_file(&mut self, file: &PickedFile) -> CardResult<StillImage>;
}

impl<T: ImageSource + ?Sized> ImageSource for &mut T {
    type Stream = T::Stream;

    async fn acquire_camera_stream(
        &mut self,
        facing: Facing,
        constraints: StreamConstraints,
    ) -> Result<Self::Stream, DeviceError> {
        (**self).acquire_camera_stream(facing, constraints).await
    }

    fn release_stream(&mut self, stream: Self::Stream) {
        (**self).release_stream(stream)
    }

    async fn capture_frame(&mut self, stream: &Self::Stream) -> CardResult<StillImage> {
        (**self).capture_frame(stream).await
    }

    async fn read_file(&mut self, file: &PickedFile) -> CardResult<StillImage> {
        (**self).read_file(file).await
    }
}

/// Shared `read_file` behavior: media type gate, then header probe.
pub fn read_picked_file(file: &PickedFile) -> CardResult<StillImage> {
    if !file.media_type.starts_with("image/") {
        return Err(CardError::invalid_file_type(format!(
            "'{}' has media type '{}'",
            file.name, file.media_type
        )));
    }
    StillImage::from_encoded(file.bytes.clone(), file.media_type.clone())
}

#[cfg(test)]
#[path = "../../tests/unit/capture/source.rs"]
mod tests;
