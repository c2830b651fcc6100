use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardError::invalid_file_type("text/plain")
            .to_string()
            .contains("invalid file type:")
    );
    assert!(
        CardError::photo_decode("x")
            .to_string()
            .contains("photo decode error:")
    );
    assert!(
        CardError::export_encode("x")
            .to_string()
            .contains("export encode error:")
    );
    assert!(
        CardError::invalid_state("x")
            .to_string()
            .contains("invalid capture state:")
    );
    assert!(
        CardError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CardError::font("x").to_string().contains("font error:"));
}

#[test]
fn device_errors_are_classified() {
    assert!(CardError::DeviceDenied("x".into()).is_device_error());
    assert!(CardError::DeviceNotFound("x".into()).is_device_error());
    assert!(CardError::DeviceUnavailable("x".into()).is_device_error());
    assert!(!CardError::invalid_file_type("x").is_device_error());
    assert!(!CardError::photo_decode("x").is_device_error());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
