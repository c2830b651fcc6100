/// Still image decode into premultiplied RGBA8.
pub mod decode;
/// Font faces and text shaping.
pub mod fonts;
