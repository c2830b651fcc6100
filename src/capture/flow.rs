use tracing::{debug, info, warn};

use crate::{
    capture::source::{DeviceError, ImageSource, PickedFile, StillImage, StreamConstraints},
    foundation::{
        core::Facing,
        error::{CardError, CardResult},
    },
};

/// Shown when camera permission is refused.
pub const MSG_DENIED: &str = "Camera access denied. You can upload a photo instead.";
/// Shown when no camera exists for the facing mode.
pub const MSG_NOT_FOUND: &str = "No camera found. Please upload a photo instead.";
/// Shown for any other acquisition failure.
pub const MSG_UNAVAILABLE: &str = "Camera unavailable. Please upload a photo instead.";

/// User-facing message for an acquisition failure.
pub fn device_error_message(err: &DeviceError) -> &'static str {
    match err {
        DeviceError::Denied => MSG_DENIED,
        DeviceError::NotFound => MSG_NOT_FOUND,
        DeviceError::Unavailable(_) => MSG_UNAVAILABLE,
    }
}

/// Where a capture session currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureStatus {
    /// Waiting for a camera stream.
    Starting,
    /// A stream is open and showing frames.
    Live,
    /// Acquisition failed; only upload or retry remain.
    Error,
    /// A still is waiting to be retaken or confirmed.
    Previewing,
    /// The still was accepted. Terminal.
    Confirmed,
}

impl CaptureStatus {
    /// Whether the flow has ended.
    pub fn is_terminal(self) -> bool {
        self == Self::Confirmed
    }
}

/// State of one capture attempt. Retake and upload replace it with a fresh value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSession {
    /// Monotonic attempt number within a flow.
    pub attempt: u64,
    /// Camera the session targets.
    pub facing: Facing,
    /// Current status.
    pub status: CaptureStatus,
    /// Message for the `Error` status.
    pub error_message: Option<String>,
    /// Still awaiting retake or confirm.
    pub pending_image: Option<StillImage>,
}

impl CaptureSession {
    fn starting(attempt: u64, facing: Facing) -> Self {
        Self {
            attempt,
            facing,
            status: CaptureStatus::Starting,
            error_message: None,
            pending_image: None,
        }
    }
}

/// The photo handed to the caller once the user confirms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmedPhoto {
    /// The accepted still.
    pub image: StillImage,
    /// Camera that was selected when the still was accepted.
    pub facing: Facing,
}

/// Drives an [`ImageSource`] through starting, live, preview and confirm.
///
/// Every operation takes `&mut self`, so at most one acquisition is in flight. Dropping a
/// pending [`CaptureFlow::start`] future cancels it and leaves the flow in `Starting` with
/// no stream held. Dropping the flow releases any held stream.
pub struct CaptureFlow<S: ImageSource> {
    source: S,
    session: CaptureSession,
    stream: Option<S::Stream>,
    constraints: StreamConstraints,
    attempts: u64,
}

impl<S: ImageSource> CaptureFlow<S> {
    /// Enter the flow with the front camera selected.
    pub fn new(source: S) -> Self {
        Self::with_facing(source, Facing::Front)
    }

    /// Enter the flow with a specific camera selected.
    pub fn with_facing(source: S, facing: Facing) -> Self {
        Self {
            source,
            session: CaptureSession::starting(1, facing),
            stream: None,
            constraints: StreamConstraints::default(),
            attempts: 1,
        }
    }

    /// Override the preferred stream resolution.
    pub fn with_constraints(mut self, constraints: StreamConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Current session.
    pub fn session(&self) -> &CaptureSession {
        &self.session
    }

    /// Current status.
    pub fn status(&self) -> CaptureStatus {
        self.session.status
    }

    /// Upload stays offered in every non-terminal state.
    pub fn upload_available(&self) -> bool {
        !self.session.status.is_terminal()
    }

    /// Whether a camera stream is currently held.
    pub fn has_active_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Acquire a stream for the selected camera.
    ///
    /// Device failures are not returned as errors: they move the session to `Error` with a
    /// user-facing message, and upload remains available.
    #[tracing::instrument(skip(self), fields(attempt = self.session.attempt, facing = %self.session.facing))]
    pub async fn start(&mut self) -> CardResult<CaptureStatus> {
        self.require(&[CaptureStatus::Starting], "start")?;
        self.release_held_stream();

        match self
            .source
            .acquire_camera_stream(self.session.facing, self.constraints)
            .await
        {
            Ok(stream) => {
                self.stream = Some(stream);
                self.session.status = CaptureStatus::Live;
                self.session.error_message = None;
                info!("camera live");
            }
            Err(err) => {
                warn!(error = %err, "camera acquisition failed; upload remains available");
                self.session.status = CaptureStatus::Error;
                self.session.error_message = Some(device_error_message(&err).to_string());
            }
        }
        Ok(self.session.status)
    }

    /// Snapshot the live frame and move to preview. The stream is released afterwards.
    pub async fn capture(&mut self) -> CardResult<()> {
        self.require(&[CaptureStatus::Live], "capture")?;
        let Some(stream) = self.stream.as_ref() else {
            return Err(CardError::invalid_state("capture without an open stream"));
        };

        let image = self.source.capture_frame(stream).await?;
        self.release_held_stream();
        debug!(width = image.width(), height = image.height(), "frame captured");
        self.session.pending_image = Some(image);
        self.session.status = CaptureStatus::Previewing;
        Ok(())
    }

    /// Switch cameras. The current stream is released before the next `start`.
    pub fn toggle_facing(&mut self) -> CardResult<()> {
        self.require(
            &[
                CaptureStatus::Live,
                CaptureStatus::Starting,
                CaptureStatus::Error,
            ],
            "toggle_facing",
        )?;
        self.release_held_stream();
        self.session.facing = self.session.facing.flipped();
        self.session.status = CaptureStatus::Starting;
        self.session.error_message = None;
        Ok(())
    }

    /// Try the camera again after a failure.
    pub fn retry_camera(&mut self) -> CardResult<()> {
        self.require(&[CaptureStatus::Error], "retry_camera")?;
        self.session.status = CaptureStatus::Starting;
        self.session.error_message = None;
        Ok(())
    }

    /// Use a picked file instead of the camera.
    ///
    /// On success any stream is released and a new session starts in `Previewing`. On failure
    /// the session is left exactly as it was.
    pub async fn upload_file(&mut self, file: &PickedFile) -> CardResult<()> {
        if self.session.status.is_terminal() {
            return Err(CardError::invalid_state(
                "upload_file is not available after confirm",
            ));
        }

        let image = self.source.read_file(file).await?;
        self.release_held_stream();
        let mut next = self.next_session(self.session.facing);
        next.pending_image = Some(image);
        next.status = CaptureStatus::Previewing;
        info!(file = %file.name, attempt = next.attempt, "photo uploaded");
        self.session = next;
        Ok(())
    }

    /// Discard the pending still and go back to the camera.
    pub fn retake(&mut self) -> CardResult<()> {
        self.require(&[CaptureStatus::Previewing], "retake")?;
        self.session = self.next_session(self.session.facing);
        Ok(())
    }

    /// Accept the pending still. A second call returns `Ok(None)` and changes nothing.
    pub fn confirm(&mut self) -> CardResult<Option<ConfirmedPhoto>> {
        if self.session.status == CaptureStatus::Confirmed {
            return Ok(None);
        }
        self.require(&[CaptureStatus::Previewing], "confirm")?;
        let Some(image) = self.session.pending_image.clone() else {
            return Err(CardError::invalid_state("confirm without a pending image"));
        };

        self.release_held_stream();
        self.session.status = CaptureStatus::Confirmed;
        info!(attempt = self.session.attempt, "photo confirmed");
        Ok(Some(ConfirmedPhoto {
            image,
            facing: self.session.facing,
        }))
    }

    /// Leave the flow, releasing every device resource.
    pub fn leave(self) {
        drop(self);
    }

    fn require(&self, allowed: &[CaptureStatus], op: &str) -> CardResult<()> {
        if allowed.contains(&self.session.status) {
            return Ok(());
        }
        Err(CardError::invalid_state(format!(
            "{op} is not available while {:?}",
            self.session.status
        )))
    }

    fn next_session(&mut self, facing: Facing) -> CaptureSession {
        self.attempts += 1;
        CaptureSession::starting(self.attempts, facing)
    }

    fn release_held_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            self.source.release_stream(stream);
        }
    }
}

impl<S: ImageSource> Drop for CaptureFlow<S> {
    fn drop(&mut self) {
        self.release_held_stream();
    }
}

impl<S: ImageSource> std::fmt::Debug for CaptureFlow<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureFlow")
            .field("session", &self.session)
            .field("has_active_stream", &self.stream.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/flow.rs"]
mod tests;
