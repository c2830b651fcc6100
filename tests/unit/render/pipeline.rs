use crate::foundation::error::CardError;

use super::*;

fn small_layout() -> CardLayout {
    CardLayout::standard().clone().with_export_scale(1.0)
}

#[test]
fn renders_headless_card_with_derived_values() {
    let mut renderer = CpuRenderer::headless();
    let fields = IdentityFields::new("Jane  Doe", "");
    let card = pollster::block_on(render_card(&small_layout(), &fields, None, &mut renderer)).unwrap();

    assert_eq!((card.width, card.height), (320, 200));
    assert_eq!(card.rgba8_premul.len(), 320 * 200 * 4);
    assert_eq!(card.optical_id.as_str(), "20240101");
    assert_eq!(card.filename, "Jane_Doe_student_id.png");
}

#[test]
fn blank_name_is_rejected_before_rendering() {
    let mut renderer = CpuRenderer::headless();
    let fields = IdentityFields::new("  ", "1990-05-03");
    let err = pollster::block_on(render_card(&small_layout(), &fields, None, &mut renderer))
        .unwrap_err();
    assert!(matches!(err, CardError::Validation(_)), "{err}");
}

#[test]
fn undecodable_photo_aborts_the_render() {
    let mut renderer = CpuRenderer::headless();
    let fields = IdentityFields::new("Ada", "1990-05-03");
    let broken = StillImage::new(b"nope".to_vec(), "image/jpeg", 640, 480);
    let err = pollster::block_on(render_card(
        &small_layout(),
        &fields,
        Some(&broken),
        &mut renderer,
    ))
    .unwrap_err();
    assert!(matches!(err, CardError::PhotoDecode(_)), "{err}");
}

#[test]
fn placeholder_option_reaches_the_card() {
    let mut renderer = CpuRenderer::headless();
    let fields = IdentityFields::new("Ada", "1990-05-03");
    let request = CardRequest {
        options: RenderOptions { placeholder: true },
        ..CardRequest::default()
    };
    let card = pollster::block_on(render_card_with(
        &small_layout(),
        &fields,
        &request,
        &mut renderer,
    ))
    .unwrap();

    // Placeholder background in the photo window's corner.
    let i = ((50 * card.width + 22) * 4) as usize;
    assert_eq!(&card.rgba8_premul[i..i + 4], &[0xf3, 0xf4, 0xf6, 0xff]);
}
