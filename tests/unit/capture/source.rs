use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([200, 120, 40, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn from_encoded_probes_dimensions() {
    let still = StillImage::from_encoded(png_bytes(7, 3), "image/png").unwrap();
    assert_eq!((still.width(), still.height()), (7, 3));
    assert_eq!(still.media_type(), "image/png");
    assert!(format!("{still:?}").contains("width: 7"));
}

#[test]
fn from_encoded_rejects_garbage() {
    let err = StillImage::from_encoded(b"not an image".to_vec(), "image/png").unwrap_err();
    assert!(matches!(err, CardError::PhotoDecode(_)), "{err}");
}

#[test]
fn read_picked_file_gates_on_media_type() {
    let text = PickedFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let err = read_picked_file(&text).unwrap_err();
    assert!(matches!(err, CardError::InvalidFileType(_)), "{err}");

    let photo = PickedFile::new("me.png", "image/png", png_bytes(4, 5));
    let still = read_picked_file(&photo).unwrap();
    assert_eq!(still.dimensions(), Dimensions { width: 4, height: 5 });
}

#[test]
fn picked_file_from_path_guesses_media_type() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("face.png");
    std::fs::write(&png, png_bytes(2, 2)).unwrap();
    let other = dir.path().join("face.bin");
    std::fs::write(&other, b"xx").unwrap();

    let picked = PickedFile::from_path(&png).unwrap();
    assert_eq!(picked.name, "face.png");
    assert_eq!(picked.media_type, "image/png");
    assert_eq!(
        PickedFile::from_path(&other).unwrap().media_type,
        "application/octet-stream"
    );
}

#[test]
fn device_errors_map_onto_card_errors() {
    assert!(matches!(
        CardError::from(DeviceError::Denied),
        CardError::DeviceDenied(_)
    ));
    assert!(matches!(
        CardError::from(DeviceError::NotFound),
        CardError::DeviceNotFound(_)
    ));
    let err = CardError::from(DeviceError::Unavailable("busy".into()));
    assert!(err.is_device_error());
    assert_eq!(err.to_string(), "camera unavailable: busy");
}

#[test]
fn default_constraints_prefer_720p() {
    let c = StreamConstraints::default();
    assert_eq!((c.ideal_width, c.ideal_height), (1280, 720));
}
