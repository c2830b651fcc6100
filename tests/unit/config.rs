use std::ffi::OsString;

use super::*;

#[test]
fn empty_object_is_the_default_config() {
    let cfg = CardConfig::from_json("{}").unwrap();
    assert_eq!(cfg, CardConfig::default());
    assert_eq!(cfg.text.header, "GENTLE HIGH SCHOOL");
    assert_eq!(cfg.export_scale, DEFAULT_EXPORT_SCALE);
}

#[test]
fn partial_text_keeps_remaining_defaults() {
    let cfg = CardConfig::from_json(r#"{ "text": { "badge": "RHS" }, "rounded": true }"#).unwrap();
    assert_eq!(cfg.text.badge, "RHS");
    assert_eq!(cfg.text.name_label, "NAME");

    let layout = cfg.layout().unwrap();
    assert_eq!(layout.frame, Some(RoundedFrame::default()));
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(CardConfig::from_json(r#"{ "scale": 2 }"#).is_err());
}

#[test]
fn non_positive_scale_is_a_validation_error() {
    let cfg = CardConfig {
        export_scale: 0.0,
        ..CardConfig::default()
    };
    let err = cfg.layout().unwrap_err();
    assert!(matches!(err, CardError::Validation(_)), "{err}");
}

#[test]
fn env_overrides_replace_font_paths() {
    let mut cfg = CardConfig::from_json(r#"{ "fonts": { "regular": "a.ttf", "bold": "b.ttf" } }"#)
        .unwrap();
    cfg.apply_env_with(|key| match key {
        ENV_FONT => Some(OsString::from("/fonts/Inter.ttf")),
        ENV_BOLD_FONT => Some(OsString::new()),
        _ => None,
    });
    assert_eq!(cfg.fonts.regular, Some(PathBuf::from("/fonts/Inter.ttf")));
    assert_eq!(cfg.fonts.bold, Some(PathBuf::from("b.ttf")));
}

#[test]
fn load_reads_file_and_reports_path_on_error() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("card.json");
    std::fs::write(&good, r#"{ "export_scale": 2.0, "placeholder": true }"#).unwrap();

    let cfg = CardConfig::load(&good).unwrap();
    assert_eq!(cfg.layout().unwrap().export_scale, 2.0);
    assert!(cfg.render_options().placeholder);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "not json").unwrap();
    let err = CardConfig::load(&bad).unwrap_err();
    assert!(format!("{err:#}").contains("bad.json"), "{err:#}");
}

#[test]
fn missing_regular_font_file_fails() {
    let cfg = CardConfig {
        fonts: FontPaths {
            regular: Some(PathBuf::from("/definitely/not/here.ttf")),
            bold: None,
        },
        ..CardConfig::default()
    };
    assert!(cfg.fonts().is_err());
}
