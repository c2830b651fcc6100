/// Convenience result type used across cardforge.
pub type CardResult<T> = Result<T, CardError>;

/// Unified error type for capture, compositing and export.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// The user or platform refused camera access.
    #[error("camera access denied: {0}")]
    DeviceDenied(String),

    /// No camera exists for the requested facing mode.
    #[error("camera not found: {0}")]
    DeviceNotFound(String),

    /// A camera exists but could not be opened or read.
    #[error("camera unavailable: {0}")]
    DeviceUnavailable(String),

    /// An uploaded file is not declared as an image.
    #[error("invalid file type: {0}")]
    InvalidFileType(String),

    /// A still image could not be decoded.
    #[error("photo decode error: {0}")]
    PhotoDecode(String),

    /// A rendered card could not be encoded for download.
    #[error("export encode error: {0}")]
    ExportEncode(String),

    /// An operation was requested in a capture state that does not expose it.
    #[error("invalid capture state: {0}")]
    InvalidState(String),

    /// Input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Font loading or text shaping failed.
    #[error("font error: {0}")]
    Font(String),

    /// Any other failure, usually I/O with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::InvalidFileType`].
    pub fn invalid_file_type(msg: impl Into<String>) -> Self {
        Self::InvalidFileType(msg.into())
    }

    /// Build a [`CardError::PhotoDecode`].
    pub fn photo_decode(msg: impl Into<String>) -> Self {
        Self::PhotoDecode(msg.into())
    }

    /// Build a [`CardError::ExportEncode`].
    pub fn export_encode(msg: impl Into<String>) -> Self {
        Self::ExportEncode(msg.into())
    }

    /// Build a [`CardError::InvalidState`].
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build a [`CardError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Font`].
    pub fn font(msg: impl Into<String>) -> Self {
        Self::Font(msg.into())
    }

    /// True for the three camera acquisition failures.
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            Self::DeviceDenied(_) | Self::DeviceNotFound(_) | Self::DeviceUnavailable(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
