use std::sync::Arc;

use kurbo::{Circle, Line, RoundedRect, RoundedRectRadii, Shape as _};

use crate::{
    assets::decode::DecodedPhoto,
    compose::crop::{AspectFill, aspect_fill},
    foundation::{
        core::{Affine, Dimensions, Point, Rect, Rgba8, Vec2},
        error::{CardError, CardResult},
    },
    identity::fields::IdentityFields,
    layout::card::{CardLayout, CardText, TextAlign, TextSlot},
};

const PATH_TOLERANCE: f64 = 0.1;

/// Geometry of a fill or stroke, in card units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeSpec {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Rectangle with per-corner radii `[top_left, top_right, bottom_right, bottom_left]`.
    RoundedRect {
        /// Bounds.
        rect: Rect,
        /// Corner radii.
        radii: [f64; 4],
    },
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// Segment; only meaningful for strokes.
    Line {
        /// Start.
        from: Point,
        /// End.
        to: Point,
    },
}

impl ShapeSpec {
    /// Flatten to a path.
    pub fn to_path(&self) -> kurbo::BezPath {
        match *self {
            Self::Rect(r) => r.to_path(PATH_TOLERANCE),
            Self::RoundedRect { rect, radii } => RoundedRect::from_rect(
                rect,
                RoundedRectRadii::new(radii[0], radii[1], radii[2], radii[3]),
            )
            .to_path(PATH_TOLERANCE),
            Self::Circle { center, radius } => Circle::new(center, radius).to_path(PATH_TOLERANCE),
            Self::Line { from, to } => Line::new(from, to).to_path(PATH_TOLERANCE),
        }
    }

    /// Bounding box.
    pub fn bounds(&self) -> Rect {
        match *self {
            Self::Rect(r) | Self::RoundedRect { rect: r, .. } => r,
            Self::Circle { center, radius } => Circle::new(center, radius).bounding_box(),
            Self::Line { from, to } => Rect::from_points(from, to),
        }
    }
}

/// How a shape is filled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// Flat color.
    Solid(Rgba8),
    /// Two-stop gradient running from `from` to `to`.
    LinearGradient {
        /// Position of the first stop.
        from: Point,
        /// Position of the second stop.
        to: Point,
        /// Stop colors.
        stops: [Rgba8; 2],
    },
}

/// One step of the card display list.
#[derive(Clone, Debug, PartialEq)]
pub enum CardOp {
    /// Push the current transform.
    Save,
    /// Pop to the last saved transform.
    Restore,
    /// Post-translate the current transform.
    Translate(Vec2),
    /// Post-rotate the current transform, radians clockwise on screen.
    Rotate(f64),
    /// Fill a shape.
    FillShape {
        /// Geometry.
        shape: ShapeSpec,
        /// Paint.
        paint: Paint,
    },
    /// Stroke a shape outline centered on its edge.
    StrokeShape {
        /// Geometry.
        shape: ShapeSpec,
        /// Line width.
        width: f64,
        /// Color.
        color: Rgba8,
    },
    /// Blurred shadow of a shape, composited beneath everything else.
    DropShadow {
        /// Shadow caster.
        shape: ShapeSpec,
        /// Blur radius in card units.
        blur: f64,
        /// Offset in card units.
        offset: Vec2,
        /// Shadow color.
        color: Rgba8,
    },
    /// One line of text.
    Text {
        /// Content, drawn verbatim.
        content: String,
        /// Placement and style.
        slot: TextSlot,
    },
    /// Decoded photo clipped to `clip`.
    Photo {
        /// Clip rect.
        clip: Rect,
        /// Aspect-fill placement.
        fill: AspectFill,
        /// Pixels.
        photo: Arc<DecodedPhoto>,
    },
}

/// Compiled display list for one card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardPlan {
    /// Raster size.
    pub surface: Dimensions,
    /// Card units to raster pixels. Derived from the same layout as `surface`.
    pub base_transform: Affine,
    /// Operations in paint order.
    pub ops: Vec<CardOp>,
}

/// Knobs that change what gets drawn without changing the layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RenderOptions {
    /// Draw a grey silhouette in the photo window when no photo is given.
    #[serde(default)]
    pub placeholder: bool,
}

/// Turn layout, strings and fields into a display list.
pub fn compile_card(
    layout: &CardLayout,
    text: &CardText,
    fields: &IdentityFields,
    photo: Option<Arc<DecodedPhoto>>,
    options: RenderOptions,
) -> CardResult<CardPlan> {
    validate_layout(layout)?;

    let mut ops = Vec::with_capacity(32);
    push_background(&mut ops, layout);

    ops.push(text_op(&text.header, layout.header));
    for (row, label, value) in [
        (&layout.name_row, &text.name_label, fields.name.clone()),
        (
            &layout.optical_row,
            &text.optical_label,
            fields.optical_id().to_string(),
        ),
    ] {
        ops.push(text_op(label, row.label));
        ops.push(CardOp::StrokeShape {
            shape: ShapeSpec::Line {
                from: row.divider.from,
                to: row.divider.to,
            },
            width: row.divider.width,
            color: row.divider.color,
        });
        ops.push(CardOp::Text {
            content: value,
            slot: row.value,
        });
    }

    ops.push(text_op(&text.year, layout.year));
    ops.push(text_op(&text.category, layout.category));

    let badge = ShapeSpec::Circle {
        center: layout.badge.center,
        radius: layout.badge.radius,
    };
    ops.push(CardOp::FillShape {
        shape: badge,
        paint: Paint::Solid(layout.badge.fill),
    });
    ops.push(CardOp::StrokeShape {
        shape: badge,
        width: layout.badge.stroke_width,
        color: layout.badge.stroke,
    });
    ops.push(text_op(&text.badge, layout.badge.label));

    ops.push(CardOp::Save);
    ops.push(CardOp::Translate(layout.caption.center.to_vec2()));
    ops.push(CardOp::Rotate(layout.caption.rotation));
    ops.push(text_op(
        &text.caption,
        TextSlot {
            anchor: Point::ORIGIN,
            align: TextAlign::Center,
            style: layout.caption.style,
        },
    ));
    ops.push(CardOp::Restore);

    let slot = layout.photo;
    match photo {
        Some(photo) => {
            let fill = aspect_fill(slot.rect, photo.dimensions());
            ops.push(CardOp::Photo {
                clip: slot.rect,
                fill,
                photo,
            });
            ops.push(CardOp::StrokeShape {
                shape: ShapeSpec::Rect(slot.rect),
                width: slot.border_width,
                color: slot.border_color,
            });
        }
        None if options.placeholder => push_placeholder(&mut ops, slot.rect),
        None => {}
    }

    Ok(CardPlan {
        surface: layout.surface_size(),
        base_transform: layout.base_transform(),
        ops,
    })
}

fn validate_layout(layout: &CardLayout) -> CardResult<()> {
    if !(layout.width.is_finite() && layout.width > 0.0)
        || !(layout.height.is_finite() && layout.height > 0.0)
    {
        return Err(CardError::validation("card size must be finite and > 0"));
    }
    if !layout.export_scale.is_finite() || layout.export_scale <= 0.0 {
        return Err(CardError::validation("export scale must be finite and > 0"));
    }
    let surface = layout.surface_size();
    if surface.width == 0 || surface.height == 0 {
        return Err(CardError::validation("surface has zero area"));
    }
    let photo = layout.photo.rect;
    if !(photo.width() > 0.0 && photo.height() > 0.0) {
        return Err(CardError::validation(format!(
            "photo window {photo:?} has no area; the card is too short"
        )));
    }
    Ok(())
}

fn text_op(content: &str, slot: TextSlot) -> CardOp {
    CardOp::Text {
        content: content.to_string(),
        slot,
    }
}

fn push_background(ops: &mut Vec<CardOp>, layout: &CardLayout) {
    let card = layout.card_rect();
    let panel = layout.side_panel;
    let gradient = Paint::LinearGradient {
        from: Point::new(panel.rect.x0, panel.rect.y0),
        to: Point::new(panel.rect.x1, panel.rect.y0),
        stops: [panel.from, panel.to],
    };

    let Some(frame) = layout.frame else {
        ops.push(CardOp::FillShape {
            shape: ShapeSpec::Rect(card),
            paint: Paint::Solid(layout.background),
        });
        ops.push(CardOp::FillShape {
            shape: ShapeSpec::Rect(layout.content),
            paint: Paint::Solid(layout.background),
        });
        ops.push(CardOp::FillShape {
            shape: ShapeSpec::Rect(panel.rect),
            paint: gradient,
        });
        return;
    };

    let silhouette = clip_to_silhouette(card, card, frame.corner_radius);
    ops.push(CardOp::DropShadow {
        shape: silhouette,
        blur: frame.shadow_blur,
        offset: frame.shadow_offset,
        color: frame.shadow_color,
    });
    ops.push(CardOp::FillShape {
        shape: silhouette,
        paint: Paint::Solid(layout.background),
    });
    ops.push(CardOp::FillShape {
        shape: clip_to_silhouette(layout.content, card, frame.corner_radius),
        paint: Paint::Solid(layout.background),
    });
    ops.push(CardOp::FillShape {
        shape: clip_to_silhouette(panel.rect, card, frame.corner_radius),
        paint: gradient,
    });
}

/// `rect` intersected with the rounded card: every corner it shares with the card is rounded.
pub fn clip_to_silhouette(rect: Rect, card: Rect, radius: f64) -> ShapeSpec {
    let rect = rect.intersect(card);
    let radius = radius.min(rect.width() / 2.0).min(rect.height() / 2.0).max(0.0);
    let near = |a: f64, b: f64| (a - b).abs() < 1e-9;
    let left = near(rect.x0, card.x0);
    let right = near(rect.x1, card.x1);
    let top = near(rect.y0, card.y0);
    let bottom = near(rect.y1, card.y1);
    let corner = |shared: bool| if shared { radius } else { 0.0 };
    let radii = [
        corner(top && left),
        corner(top && right),
        corner(bottom && right),
        corner(bottom && left),
    ];
    if radii.iter().all(|r| *r == 0.0) {
        return ShapeSpec::Rect(rect);
    }
    ShapeSpec::RoundedRect { rect, radii }
}

fn push_placeholder(ops: &mut Vec<CardOp>, rect: Rect) {
    let (w, h) = (rect.width(), rect.height());
    let ink = Rgba8::hex(0x9ca3af);
    ops.push(CardOp::FillShape {
        shape: ShapeSpec::Rect(rect),
        paint: Paint::Solid(Rgba8::hex(0xf3f4f6)),
    });
    ops.push(CardOp::FillShape {
        shape: ShapeSpec::Circle {
            center: Point::new(rect.x0 + w / 2.0, rect.y0 + h * 0.38),
            radius: w * 0.16,
        },
        paint: Paint::Solid(ink),
    });
    let shoulders = Rect::new(
        rect.x0 + w * 0.22,
        rect.y0 + h * 0.6,
        rect.x1 - w * 0.22,
        rect.y0 + h * 0.78,
    );
    let r = shoulders.height() / 2.0;
    ops.push(CardOp::FillShape {
        shape: ShapeSpec::RoundedRect {
            rect: shoulders,
            radii: [r, r, 0.0, 0.0],
        },
        paint: Paint::Solid(ink),
    });
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
