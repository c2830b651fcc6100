use super::*;

#[test]
fn transparent_src_keeps_dst() {
    assert_eq!(over([10, 20, 30, 40], [255, 255, 255, 0]), [10, 20, 30, 40]);
}

#[test]
fn opaque_src_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn half_src_over_opaque_dst_blends() {
    let out = over([0, 0, 200, 255], [128, 0, 0, 128]);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], ((200u32 * 127 + 127) / 255) as u8);
}

#[test]
fn over_in_place_checks_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    over_in_place(&mut dst, &[1, 2, 3, 255, 0, 0, 0, 0]).unwrap();
    assert_eq!(dst, vec![1, 2, 3, 255, 0, 0, 0, 0]);
}

#[test]
fn tint_scales_color_by_coverage() {
    let out = tint_coverage(&[0, 255, 51], [0, 0, 0, 90]);
    assert_eq!(&out[0..4], &[0, 0, 0, 0]);
    assert_eq!(&out[4..8], &[0, 0, 0, 90]);
    assert_eq!(out[11], 18);
}
