use crate::{
    compose::plan::{RenderOptions, compile_card},
    foundation::core::Dimensions,
    identity::fields::IdentityFields,
    layout::card::{CardLayout, CardText},
};

use super::*;

fn pixel(r: &Raster, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * r.width + x) * 4) as usize;
    [
        r.rgba8_premul[i],
        r.rgba8_premul[i + 1],
        r.rgba8_premul[i + 2],
        r.rgba8_premul[i + 3],
    ]
}

fn render(layout: &CardLayout, photo: Option<Arc<DecodedPhoto>>) -> Raster {
    let plan = compile_card(
        layout,
        &CardText::default(),
        &IdentityFields::new("Ada Lovelace", "1990-05-03"),
        photo,
        RenderOptions::default(),
    )
    .unwrap();
    CpuRenderer::headless().execute(&plan).unwrap()
}

#[test]
fn flat_card_has_white_body_and_red_panel() {
    let layout = CardLayout::standard().clone().with_export_scale(1.0);
    let r = render(&layout, None);
    assert_eq!((r.width, r.height), (320, 200));

    assert_eq!(pixel(&r, 10, 10), [255, 255, 255, 255]);
    let panel = pixel(&r, 300, 20);
    assert_eq!(panel[3], 255);
    assert!((0x7f..=0x99).contains(&panel[0]), "{panel:?}");
    assert!(panel[1] < 0x30 && panel[2] < 0x30, "{panel:?}");

    let left = pixel(&r, 281, 5);
    let right = pixel(&r, 318, 5);
    assert!(left[0] > right[0], "gradient runs left to right: {left:?} {right:?}");
}

#[test]
fn badge_is_filled_light_grey() {
    let layout = CardLayout::standard().clone().with_export_scale(1.0);
    let r = render(&layout, None);
    assert_eq!(pixel(&r, 260, 150), [0xf9, 0xfa, 0xfb, 0xff]);
}

#[test]
fn photo_fills_its_window() {
    let layout = CardLayout::standard().clone().with_export_scale(1.0);
    let red = DecodedPhoto::new(40, 20, [200u8, 0, 0, 255].repeat(40 * 20));
    let r = render(&layout, Some(Arc::new(red)));

    let inside = pixel(&r, 70, 110);
    assert!(inside[0] > 190 && inside[1] < 10 && inside[3] == 255, "{inside:?}");
    // Outside the clip stays white even though the photo overflows horizontally.
    assert_eq!(pixel(&r, 10, 110), [255, 255, 255, 255]);
    assert_eq!(pixel(&r, 127, 110), [255, 255, 255, 255]);
}

#[test]
fn oversized_photo_is_downscaled_before_drawing() {
    let layout = CardLayout::standard().clone().with_export_scale(1.0);
    let blue = DecodedPhoto::new(1000, 1300, [0u8, 0, 180, 255].repeat(1000 * 1300));
    let r = render(&layout, Some(Arc::new(blue)));
    let inside = pixel(&r, 70, 110);
    assert!(inside[2] > 170 && inside[0] < 10 && inside[3] == 255, "{inside:?}");
}

#[test]
fn rounded_card_has_transparent_margin_and_soft_shadow() {
    let layout = CardLayout::standard().rounded().with_export_scale(1.0);
    let r = render(&layout, None);
    assert_eq!((r.width, r.height), (368, 248));

    assert_eq!(pixel(&r, 0, 0), [0, 0, 0, 0]);
    assert_eq!(pixel(&r, 100, 100), [255, 255, 255, 255]);

    // Rounded corner lets the backdrop through.
    assert!(pixel(&r, 24, 24)[3] < 255);

    let shadow = pixel(&r, 184, 228);
    assert!(shadow[3] > 0 && shadow[3] < 255, "{shadow:?}");
    assert_eq!(shadow[0], 0);
}

#[test]
fn unbalanced_restore_is_rejected() {
    let plan = CardPlan {
        surface: Dimensions {
            width: 4,
            height: 4,
        },
        base_transform: Affine::IDENTITY,
        ops: vec![CardOp::Restore],
    };
    let err = CpuRenderer::headless().execute(&plan).unwrap_err();
    assert!(matches!(err, CardError::Validation(_)), "{err}");
}

#[test]
fn oversized_surface_is_rejected() {
    let plan = CardPlan {
        surface: Dimensions {
            width: 70_000,
            height: 4,
        },
        base_transform: Affine::IDENTITY,
        ops: Vec::new(),
    };
    assert!(CpuRenderer::headless().execute(&plan).is_err());
    assert!(!CpuRenderer::headless().has_fonts());
}
