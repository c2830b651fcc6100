use std::{
    collections::BTreeMap,
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use tracing::info;

use crate::{
    assets::decode::unpremultiply_rgba8_in_place,
    foundation::error::{CardError, CardResult},
    render::pipeline::RenderedCard,
};

/// Where exported cards end up.
pub trait DownloadSink {
    /// Persist `bytes` under `filename`. Returns a human-readable location.
    fn save(&mut self, filename: &str, bytes: &[u8]) -> CardResult<String>;
}

/// Writes downloads into a directory.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink rooted at `dir`, created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> CardResult<String> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename == "."
            || filename == ".."
        {
            return Err(CardError::validation(format!(
                "download filename '{filename}' is not a plain file name"
            )));
        }

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create download dir '{}'", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        Ok(path.display().to_string())
    }
}

/// Keeps downloads in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    files: BTreeMap<String, Vec<u8>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved bytes for `filename`.
    pub fn get(&self, filename: &str) -> Option<&[u8]> {
        self.files.get(filename).map(Vec::as_slice)
    }

    /// Number of saved files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was saved.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl DownloadSink for MemorySink {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> CardResult<String> {
        self.files.insert(filename.to_string(), bytes.to_vec());
        Ok(format!("memory:{filename}"))
    }
}

/// Result of a successful download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedCard {
    /// File name the card was saved under.
    pub filename: String,
    /// Where the sink put it.
    pub location: String,
    /// Encoded size.
    pub bytes: usize,
}

/// Encode a rendered card as lossless PNG with straight alpha.
pub fn encode_png(card: &RenderedCard) -> CardResult<Vec<u8>> {
    let mut straight = card.rgba8_premul.clone();
    unpremultiply_rgba8_in_place(&mut straight);
    let img = image::RgbaImage::from_raw(card.width, card.height, straight)
        .ok_or_else(|| CardError::export_encode("pixel buffer does not match card size"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| CardError::export_encode(e.to_string()))?;
    Ok(out)
}

/// Encode and hand the card to `sink` under its derived filename.
///
/// The card is only borrowed, so a failed export can be retried.
pub fn export_download(
    card: &RenderedCard,
    sink: &mut dyn DownloadSink,
) -> CardResult<ExportedCard> {
    let png = encode_png(card)?;
    let location = sink.save(&card.filename, &png)?;
    info!(filename = %card.filename, %location, bytes = png.len(), "card exported");
    Ok(ExportedCard {
        filename: card.filename.clone(),
        location,
        bytes: png.len(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/export/download.rs"]
mod tests;
