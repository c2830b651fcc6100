/// Aspect-fill cropping.
pub mod crop;
/// Card display list.
pub mod plan;
