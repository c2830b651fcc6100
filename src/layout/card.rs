//! Fixed card geometry, parameterized by the nominal card size.
//!
//! All coordinates are in card units (CSS-pixel-like) with the origin at the card's top-left
//! corner. The export scale and the optional rounded frame margin are applied once, through
//! [`CardLayout::base_transform`], so one render never mixes two resolutions.

use std::sync::LazyLock;

use crate::foundation::core::{Affine, Dimensions, Point, Rect, Rgba8, Vec2};

/// Width of the nominal card.
pub const STANDARD_WIDTH: f64 = 320.0;
/// Height of the nominal card.
pub const STANDARD_HEIGHT: f64 = 200.0;
/// Pixels per card unit in the exported raster.
pub const DEFAULT_EXPORT_SCALE: f64 = 3.0;
/// Photo aspect, width over height.
pub const PHOTO_ASPECT: f64 = 100.0 / 130.0;
/// Width of the gradient side panel.
pub const SIDE_PANEL_WIDTH: f64 = 40.0;

const INK: Rgba8 = Rgba8::hex(0x1f2937);
const MUTED: Rgba8 = Rgba8::hex(0x6b7280);
const RULE: Rgba8 = Rgba8::hex(0xd1d5db);
const ACCENT: Rgba8 = Rgba8::hex(0xdc2626);

static STANDARD: LazyLock<CardLayout> =
    LazyLock::new(|| CardLayout::for_size(STANDARD_WIDTH, STANDARD_HEIGHT));

/// Font weight of a text slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular face.
    #[default]
    Regular,
    /// Bold face.
    Bold,
}

/// Horizontal alignment relative to a text anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Anchor is the start of the line.
    #[default]
    Left,
    /// Anchor is the end of the line.
    Right,
    /// Anchor is the middle of the line.
    Center,
}

/// Size, weight and color of a run of text.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextStyle {
    /// Font size in card units.
    pub size: f32,
    /// Face weight.
    pub weight: FontWeight,
    /// Fill color.
    pub color: Rgba8,
}

impl TextStyle {
    const fn regular(size: f32, color: Rgba8) -> Self {
        Self {
            size,
            weight: FontWeight::Regular,
            color,
        }
    }

    const fn bold(size: f32, color: Rgba8) -> Self {
        Self {
            size,
            weight: FontWeight::Bold,
            color,
        }
    }
}

/// Where a line of text goes. `anchor.y` is the alphabetic baseline.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextSlot {
    /// Baseline anchor.
    pub anchor: Point,
    /// Alignment about the anchor.
    pub align: TextAlign,
    /// Style.
    pub style: TextStyle,
}

/// A straight rule.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Divider {
    /// Start point.
    pub from: Point,
    /// End point.
    pub to: Point,
    /// Stroke width.
    pub width: f64,
    /// Stroke color.
    pub color: Rgba8,
}

/// Label, divider and value stacked in the text column.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FieldRow {
    /// Static label.
    pub label: TextSlot,
    /// Rule under the label.
    pub divider: Divider,
    /// Dynamic value.
    pub value: TextSlot,
}

/// Circular badge with a centered abbreviation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Badge {
    /// Circle center.
    pub center: Point,
    /// Circle radius.
    pub radius: f64,
    /// Outline width.
    pub stroke_width: f64,
    /// Outline color.
    pub stroke: Rgba8,
    /// Interior color.
    pub fill: Rgba8,
    /// Abbreviation.
    pub label: TextSlot,
}

/// Right-edge panel with a horizontal two-stop gradient.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SidePanel {
    /// Panel bounds.
    pub rect: Rect,
    /// Color at the left edge.
    pub from: Rgba8,
    /// Color at the right edge.
    pub to: Rgba8,
}

/// Rotated caption. Text is centered on the origin after translate and rotate.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Caption {
    /// Translation applied before rotating.
    pub center: Point,
    /// Rotation in radians, clockwise on screen.
    pub rotation: f64,
    /// Style.
    pub style: TextStyle,
}

/// Photo window and its border.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoSlot {
    /// Clip rect the photo fills.
    pub rect: Rect,
    /// Border stroke width.
    pub border_width: f64,
    /// Border color.
    pub border_color: Rgba8,
}

/// Rounded-corner, drop-shadow export variant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoundedFrame {
    /// Card corner radius.
    pub corner_radius: f64,
    /// Shadow blur radius in card units.
    pub shadow_blur: f64,
    /// Shadow offset in card units.
    pub shadow_offset: Vec2,
    /// Shadow color.
    pub shadow_color: Rgba8,
    /// Transparent padding on every side of the card.
    pub margin: f64,
}

impl Default for RoundedFrame {
    fn default() -> Self {
        Self {
            corner_radius: 12.0,
            shadow_blur: 12.0,
            shadow_offset: Vec2::new(0.0, 6.0),
            shadow_color: Rgba8::rgba(0, 0, 0, 90),
            margin: 24.0,
        }
    }
}

/// Immutable description of where everything on the card sits.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardLayout {
    /// Nominal card width.
    pub width: f64,
    /// Nominal card height.
    pub height: f64,
    /// Raster pixels per card unit.
    pub export_scale: f64,
    /// Card background.
    pub background: Rgba8,
    /// White content region left of the side panel.
    pub content: Rect,
    /// Gradient side panel.
    pub side_panel: SidePanel,
    /// School header.
    pub header: TextSlot,
    /// NAME row.
    pub name_row: FieldRow,
    /// OPTICAL ID row.
    pub optical_row: FieldRow,
    /// Large year callout.
    pub year: TextSlot,
    /// Category line below the year.
    pub category: TextSlot,
    /// Badge circle.
    pub badge: Badge,
    /// Side-panel caption.
    pub caption: Caption,
    /// Photo window.
    pub photo: PhotoSlot,
    /// Present for the rounded export variant.
    pub frame: Option<RoundedFrame>,
}

/// [`CardLayout::for_size`] as a free function.
pub fn layout_for(card_width: f64, card_height: f64) -> CardLayout {
    CardLayout::for_size(card_width, card_height)
}

impl CardLayout {
    /// Shared 320×200 layout at export scale 3.
    pub fn standard() -> &'static CardLayout {
        &STANDARD
    }

    /// Flat layout for a card of the given nominal size.
    pub fn for_size(w: f64, h: f64) -> Self {
        let photo_h = (h - 70.0).max(0.0);
        let photo = Rect::new(20.0, 45.0, 20.0 + photo_h * PHOTO_ASPECT, 45.0 + photo_h);
        let col_x = photo.x1 + 15.0;
        let rule_end = w - 50.0;

        let row = |label_y: f64| FieldRow {
            label: TextSlot {
                anchor: Point::new(col_x, label_y),
                align: TextAlign::Left,
                style: TextStyle::regular(10.0, MUTED),
            },
            divider: Divider {
                from: Point::new(col_x, label_y + 10.0),
                to: Point::new(rule_end, label_y + 10.0),
                width: 1.0,
                color: RULE,
            },
            value: TextSlot {
                anchor: Point::new(col_x, label_y + 25.0),
                align: TextAlign::Left,
                style: TextStyle::bold(14.0, INK),
            },
        };

        let badge_center = Point::new(w - 60.0, h - 40.0);

        Self {
            width: w,
            height: h,
            export_scale: DEFAULT_EXPORT_SCALE,
            background: Rgba8::WHITE,
            content: Rect::new(0.0, 0.0, w - SIDE_PANEL_WIDTH, h),
            side_panel: SidePanel {
                rect: Rect::new(w - SIDE_PANEL_WIDTH, 0.0, w, h),
                from: Rgba8::hex(0x991b1b),
                to: Rgba8::hex(0x7f1d1d),
            },
            header: TextSlot {
                anchor: Point::new(w - 45.0, 25.0),
                align: TextAlign::Right,
                style: TextStyle::bold(16.0, INK),
            },
            name_row: row(60.0),
            optical_row: row(105.0),
            year: TextSlot {
                anchor: Point::new(col_x, h - 32.0),
                align: TextAlign::Left,
                style: TextStyle::bold(24.0, ACCENT),
            },
            category: TextSlot {
                anchor: Point::new(col_x, h - 15.0),
                align: TextAlign::Left,
                style: TextStyle::bold(14.0, ACCENT),
            },
            badge: Badge {
                center: badge_center,
                radius: 15.0,
                stroke_width: 2.0,
                stroke: Rgba8::hex(0x9ca3af),
                fill: Rgba8::hex(0xf9fafb),
                label: TextSlot {
                    anchor: Point::new(badge_center.x, badge_center.y + 5.0),
                    align: TextAlign::Center,
                    style: TextStyle::bold(10.0, Rgba8::hex(0x4b5563)),
                },
            },
            caption: Caption {
                center: Point::new(w - SIDE_PANEL_WIDTH / 2.0, h / 2.0),
                rotation: std::f64::consts::FRAC_PI_2,
                style: TextStyle::bold(10.0, Rgba8::WHITE),
            },
            photo: PhotoSlot {
                rect: photo,
                border_width: 2.0,
                border_color: RULE,
            },
            frame: None,
        }
    }

    /// Same card with the rounded drop-shadow frame.
    pub fn rounded(&self) -> Self {
        self.clone().with_frame(RoundedFrame::default())
    }

    /// Replace the frame settings.
    pub fn with_frame(mut self, frame: RoundedFrame) -> Self {
        self.frame = Some(frame);
        self
    }

    /// Change the raster scale.
    pub fn with_export_scale(mut self, scale: f64) -> Self {
        self.export_scale = scale;
        self
    }

    /// Padding around the card, zero for the flat variant.
    pub fn margin(&self) -> f64 {
        self.frame.map_or(0.0, |f| f.margin)
    }

    /// Card bounds in card units.
    pub fn card_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Top-left of the card on the padded canvas.
    pub fn card_origin(&self) -> Point {
        let m = self.margin();
        Point::new(m, m)
    }

    /// Nominal canvas size including the frame margin.
    pub fn canvas_size(&self) -> (f64, f64) {
        let m = self.margin();
        (self.width + 2.0 * m, self.height + 2.0 * m)
    }

    /// Raster size at the export scale.
    pub fn surface_size(&self) -> Dimensions {
        let (w, h) = self.canvas_size();
        Dimensions {
            width: (w * self.export_scale).ceil().max(0.0) as u32,
            height: (h * self.export_scale).ceil().max(0.0) as u32,
        }
    }

    /// Card units to surface pixels.
    pub fn base_transform(&self) -> Affine {
        Affine::scale(self.export_scale) * Affine::translate(self.card_origin().to_vec2())
    }
}

/// Static strings drawn on the card.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardText {
    /// Header along the top edge.
    pub header: String,
    /// Label of the name row.
    pub name_label: String,
    /// Label of the optical id row.
    pub optical_label: String,
    /// Year callout.
    pub year: String,
    /// Category under the year.
    pub category: String,
    /// Badge abbreviation.
    pub badge: String,
    /// Rotated side-panel caption.
    pub caption: String,
}

impl Default for CardText {
    fn default() -> Self {
        Self {
            header: "GENTLE HIGH SCHOOL".to_string(),
            name_label: "NAME".to_string(),
            optical_label: "OPTICAL ID".to_string(),
            year: "2024".to_string(),
            category: "OPTICAL".to_string(),
            badge: "GHS".to_string(),
            caption: "GENTLE HIGH SCHOOL".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/card.rs"]
mod tests;
