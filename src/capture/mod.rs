/// Capture state machine.
pub mod flow;
/// Image source seam and still-image payloads.
pub mod source;
/// Camera backed by still frames on disk.
pub mod still_camera;
