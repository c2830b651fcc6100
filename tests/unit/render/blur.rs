use super::*;

#[test]
fn radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6];
    assert_eq!(blur_plane_u8(&src, 3, 2, 0, 1.0).unwrap(), src);
}

#[test]
fn constant_plane_is_unchanged() {
    let src = vec![77u8; 12 * 5];
    assert_eq!(blur_plane_u8(&src, 12, 5, 4, 2.0).unwrap(), src);
}

#[test]
fn single_pixel_spreads_and_conserves_energy() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h) as usize];
    src[(4 * w + 4) as usize] = 255;

    let out = blur_plane_u8(&src, w, h, 3, 1.5).unwrap();
    assert!(out.iter().filter(|v| **v != 0).count() > 1);
    let total: i32 = out.iter().map(|v| i32::from(*v)).sum();
    assert!((total - 255).abs() <= 12, "total {total}");
    assert_eq!(out[(4 * w + 4) as usize], *out.iter().max().unwrap());
}

#[test]
fn mismatched_length_and_bad_sigma_fail() {
    assert!(blur_plane_u8(&[0; 5], 2, 2, 1, 1.0).is_err());
    assert!(blur_plane_u8(&[0; 4], 2, 2, 1, 0.0).is_err());
}
