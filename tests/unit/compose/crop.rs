use super::*;

const PHOTO: Rect = Rect::new(20.0, 45.0, 120.0, 175.0);

fn dims(width: u32, height: u32) -> Dimensions {
    Dimensions { width, height }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn wide_image_overflows_horizontally_and_centers() {
    let fill = aspect_fill(PHOTO, dims(200, 100));
    assert!(close(fill.draw.height(), 130.0));
    assert!(fill.draw.width() > 100.0);
    assert!(close(fill.draw.width(), 260.0));
    assert!(close(fill.draw.x0, 20.0 - (fill.draw.width() - 100.0) / 2.0));
    assert!(close(fill.draw.y0, 45.0));
}

#[test]
fn tall_image_overflows_vertically_and_centers() {
    let fill = aspect_fill(PHOTO, dims(50, 200));
    assert!(close(fill.draw.width(), 100.0));
    assert!(fill.draw.height() > 130.0);
    assert!(close(fill.draw.height(), 400.0));
    assert!(close(fill.draw.y0, 45.0 - (400.0 - 130.0) / 2.0));
    assert!(close(fill.draw.x0, 20.0));
}

#[test]
fn matching_aspect_fills_exactly() {
    let fill = aspect_fill(PHOTO, dims(1000, 1300));
    assert!(close(fill.draw.x0, PHOTO.x0));
    assert!(close(fill.draw.y1, PHOTO.y1));
    assert!(close(fill.visible_source.width(), 1000.0));
}

#[test]
fn visible_source_is_the_center_crop() {
    let fill = aspect_fill(PHOTO, dims(200, 100));
    let expected_w = 100.0 * 100.0 / 130.0;
    assert!(close(fill.visible_source.width(), expected_w));
    assert!(close(fill.visible_source.x0, (200.0 - expected_w) / 2.0));
    assert!(close(fill.visible_source.y0, 0.0));
    assert!(close(fill.visible_source.y1, 100.0));
}

#[test]
fn zero_sized_image_falls_back_to_target() {
    let fill = aspect_fill(PHOTO, dims(0, 0));
    assert_eq!(fill.draw, PHOTO);
}
