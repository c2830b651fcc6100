//! Cardforge captures a portrait photo and composites it onto an identity card.
//!
//! Two pieces carry the crate:
//!
//! - [`CaptureFlow`] drives a camera through live preview, capture, retake and confirm, and
//!   falls back to file upload whenever the device is unavailable.
//! - [`render_card`] compiles a fixed [`CardLayout`] into a display list and rasterizes it on
//!   the CPU at print resolution. [`export_download`] then saves it as a PNG.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

/// Camera acquisition and the capture state machine.
pub mod capture;
/// Photo decode and font loading.
pub mod assets;
/// Display-list compilation.
pub mod compose;
/// JSON configuration.
pub mod config;
/// PNG encoding and download sinks.
pub mod export;
/// Name and birthday derived values.
pub mod identity;
/// Card geometry.
pub mod layout;
/// CPU rasterization and the render pipeline.
pub mod render;

pub use crate::foundation::core::{Affine, Dimensions, Facing, Point, Rect, Rgba8, Vec2};
pub use crate::foundation::error::{CardError, CardResult};

pub use crate::assets::decode::{DecodedPhoto, decode_still};
pub use crate::assets::fonts::{CardFonts, FontFace};
pub use crate::capture::flow::{CaptureFlow, CaptureSession, CaptureStatus, ConfirmedPhoto};
pub use crate::capture::source::{
    DeviceError, ImageSource, PickedFile, StillImage, StreamConstraints,
};
pub use crate::capture::still_camera::StillFrameCamera;
pub use crate::compose::crop::{AspectFill, aspect_fill};
pub use crate::compose::plan::{CardOp, CardPlan, RenderOptions, compile_card};
pub use crate::config::CardConfig;
pub use crate::export::download::{
    DirectorySink, DownloadSink, ExportedCard, MemorySink, encode_png, export_download,
};
pub use crate::identity::fields::{IdentityFields, OpticalId, card_filename};
pub use crate::layout::card::{CardLayout, CardText, RoundedFrame};
pub use crate::render::cpu::CpuRenderer;
pub use crate::render::pipeline::{CardRequest, RenderedCard, render_card, render_card_with};
