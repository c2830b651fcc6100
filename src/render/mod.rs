/// Single-channel Gaussian blur for shadows.
pub mod blur;
/// Premultiplied source-over compositing.
pub mod composite;
/// `vello_cpu` display-list executor.
pub mod cpu;
/// Validate, decode, compile, rasterize.
pub mod pipeline;
