use std::sync::Arc;

use tracing::info;

use crate::{
    assets::decode::decode_still,
    capture::source::StillImage,
    compose::plan::{RenderOptions, compile_card},
    foundation::error::CardResult,
    identity::fields::{IdentityFields, OpticalId},
    layout::card::{CardLayout, CardText},
    render::cpu::CpuRenderer,
};

/// Finished card raster plus the values derived while rendering it.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedCard {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major.
    pub rgba8_premul: Vec<u8>,
    /// OpticalId printed on the card.
    pub optical_id: OpticalId,
    /// Suggested download filename.
    pub filename: String,
}

impl std::fmt::Debug for RenderedCard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderedCard")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("optical_id", &self.optical_id)
            .field("filename", &self.filename)
            .finish_non_exhaustive()
    }
}

/// What to draw besides the identity fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardRequest<'a> {
    /// Static strings.
    pub text: CardText,
    /// Drawing options.
    pub options: RenderOptions,
    /// Photo to place in the window.
    pub photo: Option<&'a StillImage>,
}

/// Render a card with the default strings and options.
pub async fn render_card(
    layout: &CardLayout,
    fields: &IdentityFields,
    photo: Option<&StillImage>,
    renderer: &mut CpuRenderer,
) -> CardResult<RenderedCard> {
    let request = CardRequest {
        photo,
        ..CardRequest::default()
    };
    render_card_with(layout, fields, &request, renderer).await
}

/// Validate, decode, compile and rasterize one card.
///
/// The photo is decoded before anything is drawn; a decode failure aborts the whole render.
#[tracing::instrument(skip_all, fields(scale = layout.export_scale, rounded = layout.frame.is_some()))]
pub async fn render_card_with(
    layout: &CardLayout,
    fields: &IdentityFields,
    request: &CardRequest<'_>,
    renderer: &mut CpuRenderer,
) -> CardResult<RenderedCard> {
    fields.validate()?;

    let photo = match request.photo {
        Some(still) => Some(Arc::new(decode_still(still).await?)),
        None => None,
    };

    let plan = compile_card(layout, &request.text, fields, photo, request.options)?;
    let raster = renderer.execute(&plan)?;

    let rendered = RenderedCard {
        width: raster.width,
        height: raster.height,
        rgba8_premul: raster.rgba8_premul,
        optical_id: fields.optical_id(),
        filename: fields.card_filename(),
    };
    info!(
        width = rendered.width,
        height = rendered.height,
        optical_id = %rendered.optical_id,
        "card rendered"
    );
    Ok(rendered)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
