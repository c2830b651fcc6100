use super::*;

#[test]
fn standard_card_geometry() {
    let l = CardLayout::standard();
    assert_eq!((l.width, l.height), (320.0, 200.0));
    assert_eq!(l.export_scale, 3.0);
    assert_eq!(l.side_panel.rect, Rect::new(280.0, 0.0, 320.0, 200.0));
    assert_eq!(l.content, Rect::new(0.0, 0.0, 280.0, 200.0));
    assert_eq!(l.header.anchor, Point::new(275.0, 25.0));
    assert_eq!(l.header.align, TextAlign::Right);
    assert_eq!(l.badge.center, Point::new(260.0, 160.0));
    assert_eq!(l.caption.center, Point::new(300.0, 100.0));
    assert!(l.frame.is_none());
}

#[test]
fn standard_photo_is_100_by_130() {
    let photo = CardLayout::standard().photo.rect;
    assert_eq!(photo.origin(), Point::new(20.0, 45.0));
    assert!((photo.width() - 100.0).abs() < 1e-9);
    assert!((photo.height() - 130.0).abs() < 1e-9);
}

#[test]
fn text_column_sits_right_of_the_photo() {
    let l = CardLayout::standard();
    for row in [&l.name_row, &l.optical_row] {
        assert!(row.label.anchor.x > l.photo.rect.x1);
        assert_eq!(row.divider.to.x, 270.0);
        assert!(row.label.anchor.y < row.divider.from.y);
        assert!(row.divider.from.y < row.value.anchor.y);
    }
    assert!(l.name_row.value.anchor.y < l.optical_row.label.anchor.y);
    assert!(l.badge.center.x + l.badge.radius < l.side_panel.rect.x0);
}

#[test]
fn flat_surface_is_scaled_card() {
    let l = CardLayout::standard();
    assert_eq!(l.canvas_size(), (320.0, 200.0));
    assert_eq!(
        l.surface_size(),
        Dimensions {
            width: 960,
            height: 600
        }
    );
    assert_eq!(l.base_transform(), Affine::scale(3.0));
}

#[test]
fn rounded_variant_pads_for_the_shadow() {
    let l = CardLayout::standard().rounded().with_export_scale(2.0);
    let frame = l.frame.unwrap();
    assert_eq!(frame.corner_radius, 12.0);
    assert_eq!(l.card_origin(), Point::new(24.0, 24.0));
    assert_eq!(l.canvas_size(), (368.0, 248.0));
    assert_eq!(
        l.surface_size(),
        Dimensions {
            width: 736,
            height: 496
        }
    );
    assert_eq!(
        l.base_transform() * Point::new(0.0, 0.0),
        Point::new(48.0, 48.0)
    );
}

#[test]
fn layout_scales_with_card_size() {
    let l = layout_for(400.0, 250.0);
    assert_eq!(l.side_panel.rect.x0, 360.0);
    assert!((l.photo.rect.height() - 180.0).abs() < 1e-9);
    assert!((l.photo.rect.width() / l.photo.rect.height() - PHOTO_ASPECT).abs() < 1e-9);
}

#[test]
fn short_card_photo_collapses_instead_of_inverting() {
    let l = layout_for(320.0, 50.0);
    assert_eq!(l.photo.rect.height(), 0.0);
    assert_eq!(l.photo.rect.width(), 0.0);
    assert!(l.photo.rect.y1 >= l.photo.rect.y0);
}

#[test]
fn layout_serializes_to_json() {
    let json = serde_json::to_value(CardLayout::standard().rounded()).unwrap();
    assert_eq!(json["width"], 320.0);
    assert_eq!(json["header"]["align"], "right");
    assert_eq!(json["caption"]["style"]["weight"], "bold");
    assert_eq!(json["frame"]["margin"], 24.0);
}

#[test]
fn card_text_defaults_fill_missing_keys() {
    let text: CardText = serde_json::from_str(r#"{"header":"ACME ACADEMY"}"#).unwrap();
    assert_eq!(text.header, "ACME ACADEMY");
    assert_eq!(text.name_label, "NAME");
    assert_eq!(text.badge, "GHS");
}
