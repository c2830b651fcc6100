use super::*;

#[test]
fn missing_font_file_is_reported() {
    let err = CardFonts::load(Path::new("/definitely/not/here.ttf"), None).unwrap_err();
    assert!(err.to_string().contains("read font"), "{err}");
}

#[test]
fn bold_falls_back_to_regular() {
    let fonts = CardFonts::from_faces(FontFace::new(vec![1, 2, 3], 0), None);
    assert_eq!(
        fonts.face(FontWeight::Bold).bytes(),
        fonts.face(FontWeight::Regular).bytes()
    );
}

#[test]
fn garbage_bytes_register_no_family() {
    let fonts = CardFonts::from_faces(FontFace::new(b"not a font".to_vec(), 0), None);
    let err = TextShaper::new(&fonts).err().unwrap();
    assert!(matches!(err, CardError::Font(_)), "{err}");
}

fn fixture_fonts() -> CardFonts {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/fonts");
    CardFonts::load(
        &dir.join("DejaVuSans.ttf"),
        Some(&dir.join("DejaVuSans-Bold.ttf")),
    )
    .unwrap()
}

#[test]
fn fixture_fonts_shape_a_line() {
    let mut shaper = TextShaper::new(&fixture_fonts()).unwrap();
    assert_eq!(shaper.family_name(FontWeight::Regular), "DejaVu Sans");

    let line = shaper
        .shape_line("GHS", FontWeight::Bold, 10.0, Rgba8::WHITE)
        .unwrap();
    assert_eq!(line.glyphs.len(), 3);
    assert!(line.width > 0.0);
    assert!(line.baseline > 0.0 && line.baseline < 20.0);
    assert!(line.glyphs.windows(2).all(|w| w[0].x < w[1].x));

    let regular = shaper
        .shape_line("GHS", FontWeight::Regular, 10.0, Rgba8::WHITE)
        .unwrap();
    assert!(line.width > regular.width);

    let err = shaper
        .shape_line("x", FontWeight::Regular, 0.0, Rgba8::WHITE)
        .unwrap_err();
    assert!(matches!(err, CardError::Validation(_)));
}

#[test]
fn system_discovery_reports_font_errors() {
    match CardFonts::discover_system() {
        Ok(fonts) => assert!(!fonts.face(FontWeight::Regular).bytes().is_empty()),
        Err(err) => assert!(matches!(err, CardError::Font(_)), "{err}"),
    }
}
