//! Card fonts and line shaping.

use std::{borrow::Cow, path::Path, sync::Arc};

use anyhow::Context as _;
use tracing::debug;

use crate::{
    foundation::{
        core::Rgba8,
        error::{CardError, CardResult},
    },
    layout::card::FontWeight,
};

/// Families tried, in order, when discovering system fonts.
const PREFERRED_FAMILIES: &[&str] = &[
    "Arial",
    "Liberation Sans",
    "Helvetica",
    "DejaVu Sans",
    "Noto Sans",
];

/// One font file, shared between the shaper and the rasterizer.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl FontFace {
    /// Face `index` of a font file (non-zero only for collections).
    pub fn new(bytes: Vec<u8>, index: u32) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index,
        }
    }

    /// Raw font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Face index within the file.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Font handle for glyph rasterization.
    pub fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            self.index,
        )
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("bytes", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

/// Regular and bold faces used on the card.
#[derive(Clone, Debug)]
pub struct CardFonts {
    regular: FontFace,
    bold: FontFace,
}

impl CardFonts {
    /// Build from in-memory faces. Without a bold face, the regular face is reused.
    pub fn from_faces(regular: FontFace, bold: Option<FontFace>) -> Self {
        let bold = bold.unwrap_or_else(|| regular.clone());
        Self { regular, bold }
    }

    /// Load font files from disk.
    pub fn load(regular: &Path, bold: Option<&Path>) -> CardResult<Self> {
        let read = |p: &Path| -> CardResult<FontFace> {
            let bytes =
                std::fs::read(p).with_context(|| format!("read font '{}'", p.display()))?;
            Ok(FontFace::new(bytes, 0))
        };
        let regular = read(regular)?;
        let bold = bold.map(read).transpose()?;
        Ok(Self::from_faces(regular, bold))
    }

    /// Find a sans-serif regular/bold pair among installed fonts.
    pub fn discover_system() -> CardResult<Self> {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            return Err(CardError::font("no system fonts installed"));
        }

        let regular = query_face(&db, usvg::fontdb::Weight::NORMAL)
            .ok_or_else(|| CardError::font("no usable regular face"))?;
        let bold = query_face(&db, usvg::fontdb::Weight::BOLD);
        debug!(faces = db.len(), bold = bold.is_some(), "system fonts discovered");
        Ok(Self::from_faces(regular, bold))
    }

    /// Face for a weight.
    pub fn face(&self, weight: FontWeight) -> &FontFace {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }
}

fn query_face(db: &usvg::fontdb::Database, weight: usvg::fontdb::Weight) -> Option<FontFace> {
    let mut candidates: Vec<usvg::fontdb::Family<'_>> = PREFERRED_FAMILIES
        .iter()
        .map(|&name| usvg::fontdb::Family::Name(name))
        .collect();
    candidates.push(usvg::fontdb::Family::SansSerif);

    let id = candidates
        .iter()
        .find_map(|family| {
            let id = db.query(&usvg::fontdb::Query {
                families: std::slice::from_ref(family),
                weight,
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            })?;
            // `query` picks the nearest weight; only accept an exact bold.
            let face = db.face(id)?;
            (weight != usvg::fontdb::Weight::BOLD || face.weight == weight).then_some(id)
        })
        .or_else(|| {
            (weight == usvg::fontdb::Weight::NORMAL)
                .then(|| db.faces().next().map(|f| f.id))
                .flatten()
        })?;

    db.with_face_data(id, |data, index| FontFace::new(data.to_vec(), index))
}

/// Glyph id and pen position inside a line box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapedGlyph {
    /// Glyph id in the face.
    pub id: u32,
    /// Horizontal position.
    pub x: f32,
    /// Baseline position.
    pub y: f32,
}

/// A shaped single line of text.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedLine {
    /// Glyphs positioned inside the line box.
    pub glyphs: Vec<ShapedGlyph>,
    /// Font size the glyphs were shaped at.
    pub font_size: f32,
    /// Advance width of the line.
    pub width: f32,
    /// Baseline offset from the top of the line box.
    pub baseline: f32,
}

struct FaceContext {
    font_ctx: parley::FontContext,
    family: String,
}

impl FaceContext {
    fn new(face: &FontFace) -> CardResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CardError::font("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CardError::font("registered font family has no name"))?
            .to_string();
        Ok(Self { font_ctx, family })
    }
}

/// Shapes text with Parley against the card faces.
///
/// Each face lives in its own font context so family resolution is unambiguous even when
/// both faces share a family name.
pub struct TextShaper {
    regular: FaceContext,
    bold: FaceContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
}

impl TextShaper {
    /// Register both faces.
    pub fn new(fonts: &CardFonts) -> CardResult<Self> {
        Ok(Self {
            regular: FaceContext::new(&fonts.regular)?,
            bold: FaceContext::new(&fonts.bold)?,
            layout_ctx: parley::LayoutContext::new(),
        })
    }

    /// Family name registered for a weight.
    pub fn family_name(&self, weight: FontWeight) -> &str {
        match weight {
            FontWeight::Regular => &self.regular.family,
            FontWeight::Bold => &self.bold.family,
        }
    }

    /// Shape `text` as one unwrapped line.
    pub fn shape_line(
        &mut self,
        text: &str,
        weight: FontWeight,
        size_px: f32,
        color: Rgba8,
    ) -> CardResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CardError::validation("text size must be finite and > 0"));
        }

        let face = match weight {
            FontWeight::Regular => &mut self.regular,
            FontWeight::Bold => &mut self.bold,
        };
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut face.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));

        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut shaped = ShapedLine {
            glyphs: Vec::new(),
            font_size: size_px,
            width: layout.width(),
            baseline: 0.0,
        };
        if let Some(line) = layout.lines().next() {
            shaped.baseline = line.metrics().baseline;
        }
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                shaped.font_size = run.run().font_size();
                shaped
                    .glyphs
                    .extend(run.positioned_glyphs().map(|g| ShapedGlyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    }));
            }
        }
        Ok(shaped)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
