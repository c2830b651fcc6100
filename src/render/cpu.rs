use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    assets::{
        decode::DecodedPhoto,
        fonts::{CardFonts, TextShaper},
    },
    compose::{
        crop::AspectFill,
        plan::{CardOp, CardPlan, Paint, ShapeSpec},
    },
    foundation::{
        core::{Affine, Point, Rect, Rgba8, Vec2},
        error::{CardError, CardResult},
    },
    layout::card::{FontWeight, TextAlign, TextSlot},
    render::{blur::blur_plane_u8, composite},
};

/// Premultiplied RGBA8 raster produced by [`CpuRenderer::execute`].
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub rgba8_premul: Vec<u8>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

struct TextBackend {
    shaper: TextShaper,
    regular: vello_cpu::peniko::FontData,
    bold: vello_cpu::peniko::FontData,
}

impl TextBackend {
    fn font(&self, weight: FontWeight) -> &vello_cpu::peniko::FontData {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

struct ShadowJob {
    shape: ShapeSpec,
    transform: Affine,
    blur_px: f64,
    color: Rgba8,
}

/// Executes a [`CardPlan`] on the `vello_cpu` rasterizer.
///
/// Without fonts, text operations are skipped and everything else still renders.
pub struct CpuRenderer {
    text: Option<TextBackend>,
}

impl CpuRenderer {
    /// Renderer that draws text with `fonts`.
    pub fn new(fonts: &CardFonts) -> CardResult<Self> {
        Ok(Self {
            text: Some(TextBackend {
                shaper: TextShaper::new(fonts)?,
                regular: fonts.face(FontWeight::Regular).font_data(),
                bold: fonts.face(FontWeight::Bold).font_data(),
            }),
        })
    }

    /// Renderer without fonts.
    pub fn headless() -> Self {
        Self { text: None }
    }

    /// Whether text operations will be drawn.
    pub fn has_fonts(&self) -> bool {
        self.text.is_some()
    }

    /// Rasterize every operation of `plan`.
    pub fn execute(&mut self, plan: &CardPlan) -> CardResult<Raster> {
        let width: u16 = plan
            .surface
            .width
            .try_into()
            .map_err(|_| CardError::validation("surface width exceeds u16"))?;
        let height: u16 = plan
            .surface
            .height
            .try_into()
            .map_err(|_| CardError::validation("surface height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(CardError::validation("surface has zero area"));
        }

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        let mut current = plan.base_transform;
        let mut stack = Vec::<Affine>::new();
        let mut shadows = Vec::<ShadowJob>::new();
        let mut skipped_text = 0usize;

        for op in &plan.ops {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            match op {
                CardOp::Save => stack.push(current),
                CardOp::Restore => {
                    current = stack
                        .pop()
                        .ok_or_else(|| CardError::validation("restore without matching save"))?;
                }
                CardOp::Translate(v) => current = current * Affine::translate(*v),
                CardOp::Rotate(angle) => current = current * Affine::rotate(*angle),
                CardOp::FillShape { shape, paint } => {
                    ctx.set_transform(affine_to_cpu(current));
                    match *paint {
                        Paint::Solid(c) => ctx.set_paint(color_to_cpu(c)),
                        Paint::LinearGradient { from, to, stops } => {
                            let bounds = shape.bounds();
                            let density = transform_scale(current).max(1.0);
                            ctx.set_paint(gradient_paint(bounds, from, to, stops, density)?);
                            ctx.set_paint_transform(affine_to_cpu(
                                Affine::translate(bounds.origin().to_vec2())
                                    * Affine::scale(1.0 / density),
                            ));
                        }
                    }
                    ctx.fill_path(&bezpath_to_cpu(&shape.to_path()));
                }
                CardOp::StrokeShape {
                    shape,
                    width,
                    color,
                } => {
                    let outline = kurbo::stroke(
                        shape.to_path().iter(),
                        &kurbo::Stroke::new(*width),
                        &kurbo::StrokeOpts::default(),
                        0.01,
                    );
                    ctx.set_transform(affine_to_cpu(current));
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.fill_path(&bezpath_to_cpu(&outline));
                }
                CardOp::DropShadow {
                    shape,
                    blur,
                    offset,
                    color,
                } => shadows.push(ShadowJob {
                    shape: *shape,
                    transform: current * Affine::translate(*offset),
                    blur_px: blur * transform_scale(current),
                    color: *color,
                }),
                CardOp::Text { content, slot } => match self.text.as_mut() {
                    Some(text) => draw_text(&mut ctx, text, current, content, *slot)?,
                    None => skipped_text += 1,
                },
                CardOp::Photo { clip, fill, photo } => {
                    draw_photo(&mut ctx, current, *clip, *fill, photo)?;
                }
            }
        }
        if !stack.is_empty() {
            return Err(CardError::validation("save without matching restore"));
        }
        if skipped_text > 0 {
            warn!(skipped_text, "no fonts available; text was not drawn");
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);
        let mut rgba8_premul = pixmap.data_as_u8_slice().to_vec();

        if !shadows.is_empty() {
            let mut under = render_shadows(&shadows, width, height)?;
            composite::over_in_place(&mut under, &rgba8_premul)?;
            rgba8_premul = under;
        }

        Ok(Raster {
            width: u32::from(width),
            height: u32::from(height),
            rgba8_premul,
        })
    }
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    text: &mut TextBackend,
    current: Affine,
    content: &str,
    slot: TextSlot,
) -> CardResult<()> {
    if content.is_empty() {
        return Ok(());
    }
    let style = slot.style;
    let line = text
        .shaper
        .shape_line(content, style.weight, style.size, style.color)?;

    let left = match slot.align {
        TextAlign::Left => slot.anchor.x,
        TextAlign::Right => slot.anchor.x - f64::from(line.width),
        TextAlign::Center => slot.anchor.x - f64::from(line.width) / 2.0,
    };
    let top = slot.anchor.y - f64::from(line.baseline);

    ctx.set_transform(affine_to_cpu(current * Affine::translate((left, top))));
    ctx.set_paint(color_to_cpu(style.color));
    let glyphs = line.glyphs.iter().map(|g| vello_cpu::Glyph {
        id: g.id,
        x: g.x,
        y: g.y,
    });
    ctx.glyph_run(text.font(style.weight))
        .font_size(line.font_size)
        .fill_glyphs(glyphs);
    Ok(())
}

fn draw_photo(
    ctx: &mut vello_cpu::RenderContext,
    current: Affine,
    clip: Rect,
    fill: AspectFill,
    photo: &Arc<DecodedPhoto>,
) -> CardResult<()> {
    let scale = transform_scale(current);
    let (pixels, source) = fit_photo(photo, fill, scale)?;
    let (pw, ph) = (f64::from(pixels.width), f64::from(pixels.height));

    // Image space onto the aspect-fill rect; filling only the visible part is the clip.
    let placement = current
        * Affine::translate(fill.draw.origin().to_vec2())
        * Affine::scale_non_uniform(fill.draw.width() / pw, fill.draw.height() / ph);
    let visible = source.intersect(Rect::new(0.0, 0.0, pw, ph));
    if visible.width() <= 0.0 || visible.height() <= 0.0 {
        debug!(?clip, "photo does not intersect its clip");
        return Ok(());
    }

    let pixmap = premul_bytes_to_pixmap(&pixels.rgba8_premul, pixels.width, pixels.height)?;
    ctx.set_transform(affine_to_cpu(placement));
    ctx.set_paint(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    });
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        visible.x0, visible.y0, visible.x1, visible.y1,
    ));
    Ok(())
}

/// Downscale photos far larger than their on-surface size. Returns the pixels to draw and the
/// visible source rect in their coordinates.
fn fit_photo(
    photo: &Arc<DecodedPhoto>,
    fill: AspectFill,
    scale: f64,
) -> CardResult<(Arc<DecodedPhoto>, Rect)> {
    let target_w = (fill.draw.width() * scale).ceil().max(1.0);
    let target_h = (fill.draw.height() * scale).ceil().max(1.0);
    let too_big = f64::from(photo.width) > 2.0 * target_w
        || f64::from(photo.height) > 2.0 * target_h
        || photo.width > u32::from(u16::MAX)
        || photo.height > u32::from(u16::MAX);
    if !too_big {
        return Ok((Arc::clone(photo), fill.visible_source));
    }

    let (nw, nh) = (
        (target_w as u32).min(u32::from(u16::MAX)),
        (target_h as u32).min(u32::from(u16::MAX)),
    );
    let buf = image::RgbaImage::from_raw(photo.width, photo.height, photo.rgba8_premul.clone())
        .ok_or_else(|| CardError::validation("photo byte length mismatch"))?;
    let resized = image::imageops::resize(&buf, nw, nh, image::imageops::FilterType::Triangle);
    debug!(
        from_w = photo.width,
        from_h = photo.height,
        to_w = nw,
        to_h = nh,
        "photo downscaled for drawing"
    );

    let sx = f64::from(nw) / f64::from(photo.width);
    let sy = f64::from(nh) / f64::from(photo.height);
    let v = fill.visible_source;
    let source = Rect::new(v.x0 * sx, v.y0 * sy, v.x1 * sx, v.y1 * sy);
    Ok((
        Arc::new(DecodedPhoto::new(nw, nh, resized.into_raw())),
        source,
    ))
}

fn render_shadows(jobs: &[ShadowJob], width: u16, height: u16) -> CardResult<Vec<u8>> {
    let (w, h) = (u32::from(width), u32::from(height));
    let mut out = vec![0u8; w as usize * h as usize * 4];

    for job in jobs {
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(affine_to_cpu(job.transform));
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
        ctx.fill_path(&bezpath_to_cpu(&job.shape.to_path()));
        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.render_to_pixmap(&mut pixmap);

        let coverage: Vec<u8> = pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect();
        let radius = job.blur_px.round().max(0.0) as u32;
        let sigma = (radius as f32 / 2.0).max(0.5);
        let blurred = blur_plane_u8(&coverage, w, h, radius, sigma)?;
        let tinted = composite::tint_coverage(&blurred, job.color.to_premul());
        composite::over_in_place(&mut out, &tinted)?;
    }
    Ok(out)
}

/// Rasterize a two-stop gradient over `bounds` at `density` pixels per unit.
fn gradient_paint(
    bounds: Rect,
    from: Point,
    to: Point,
    stops: [Rgba8; 2],
    density: f64,
) -> CardResult<vello_cpu::Image> {
    let w = (bounds.width() * density).ceil().max(1.0) as u32;
    let h = (bounds.height() * density).ceil().max(1.0) as u32;
    let axis: Vec2 = to - from;
    let len2 = axis.hypot2();

    let mut bytes = vec![0u8; (w as usize) * (h as usize) * 4];
    for y in 0..h {
        for x in 0..w {
            let p = Point::new(
                bounds.x0 + (f64::from(x) + 0.5) / density,
                bounds.y0 + (f64::from(y) + 0.5) / density,
            );
            let t = if len2 <= 0.0 {
                0.0
            } else {
                ((p - from).dot(axis) / len2).clamp(0.0, 1.0)
            };
            let lerp = |a: u8, b: u8| -> u8 {
                let (af, bf) = (f64::from(a), f64::from(b));
                (af + (bf - af) * t).round().clamp(0.0, 255.0) as u8
            };
            let c = Rgba8::rgba(
                lerp(stops[0].r, stops[1].r),
                lerp(stops[0].g, stops[1].g),
                lerp(stops[0].b, stops[1].b),
                lerp(stops[0].a, stops[1].a),
            );
            let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
            bytes[idx..idx + 4].copy_from_slice(&c.to_premul());
        }
    }

    let pixmap = premul_bytes_to_pixmap(&bytes, w, h)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

/// Uniform scale factor of an affine (square root of the determinant).
fn transform_scale(a: Affine) -> f64 {
    a.determinant().abs().sqrt()
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::validation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(CardError::validation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
