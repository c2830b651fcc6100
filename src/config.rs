use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    assets::fonts::CardFonts,
    compose::plan::RenderOptions,
    foundation::error::{CardError, CardResult},
    layout::card::{CardLayout, CardText, DEFAULT_EXPORT_SCALE, RoundedFrame},
};

/// Environment variable overriding [`FontPaths::regular`].
pub const ENV_FONT: &str = "CARDFORGE_FONT";
/// Environment variable overriding [`FontPaths::bold`].
pub const ENV_BOLD_FONT: &str = "CARDFORGE_BOLD_FONT";

/// Font files to load instead of system discovery.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontPaths {
    /// Regular face. When unset, system fonts are discovered.
    pub regular: Option<PathBuf>,
    /// Bold face; the regular face is reused when unset.
    pub bold: Option<PathBuf>,
}

/// Card rendering configuration. Every field has a default, so `{}` is a valid file.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardConfig {
    /// Static strings drawn on the card.
    pub text: CardText,
    /// Export the rounded drop-shadow variant.
    pub rounded: bool,
    /// Overrides the frame used when `rounded` is set.
    pub frame: Option<RoundedFrame>,
    /// Surface pixels per card unit.
    pub export_scale: f64,
    /// Font file overrides.
    pub fonts: FontPaths,
    /// Draw a silhouette when no photo is given.
    pub placeholder: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            text: CardText::default(),
            rounded: false,
            frame: None,
            export_scale: DEFAULT_EXPORT_SCALE,
            fonts: FontPaths::default(),
            placeholder: false,
        }
    }
}

impl CardConfig {
    /// Read a JSON config file and apply environment overrides.
    pub fn load(path: &Path) -> CardResult<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg = Self::from_json(&raw)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.apply_env();
        Ok(cfg)
    }

    /// Parse config JSON without touching the environment.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Apply `CARDFORGE_FONT` / `CARDFORGE_BOLD_FONT` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var_os(key));
    }

    /// Apply font overrides from `lookup`. Empty values are ignored.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<std::ffi::OsString>) {
        let pick = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        if let Some(p) = pick(ENV_FONT) {
            self.fonts.regular = Some(p);
        }
        if let Some(p) = pick(ENV_BOLD_FONT) {
            self.fonts.bold = Some(p);
        }
    }

    /// Layout this config describes.
    pub fn layout(&self) -> CardResult<CardLayout> {
        if !(self.export_scale.is_finite() && self.export_scale > 0.0) {
            return Err(CardError::validation(format!(
                "export_scale must be positive, got {}",
                self.export_scale
            )));
        }
        let base = CardLayout::standard().clone();
        let layout = if self.rounded {
            base.with_frame(self.frame.unwrap_or_default())
        } else {
            base
        };
        Ok(layout.with_export_scale(self.export_scale))
    }

    /// Render switches for the compiler.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            placeholder: self.placeholder,
        }
    }

    /// Fonts from the configured paths, or system discovery when no regular face is set.
    pub fn fonts(&self) -> CardResult<CardFonts> {
        match &self.fonts.regular {
            Some(regular) => CardFonts::load(regular, self.fonts.bold.as_deref()),
            None => CardFonts::discover_system(),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
