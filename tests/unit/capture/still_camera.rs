use super::*;

fn write_frame(dir: &Path, name: &str, w: u32, h: u32) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_pixel(w, h, image::Rgb([30, 60, 90]))
        .save(&path)
        .unwrap();
    path
}

#[test]
fn acquire_then_release_leaves_no_tracks() {
    let dir = tempfile::tempdir().unwrap();
    let mut cam = StillFrameCamera::new()
        .with_front(write_frame(dir.path(), "front.png", 8, 6))
        .with_back(write_frame(dir.path(), "back.png", 6, 8));

    for facing in [Facing::Front, Facing::Back] {
        let stream = pollster::block_on(
            cam.acquire_camera_stream(facing, StreamConstraints::default()),
        )
        .unwrap();
        assert_eq!(stream.facing(), facing);
        assert_eq!(cam.active_tracks(), 1);
        cam.release_stream(stream);
        assert_eq!(cam.active_tracks(), 0);
    }
}

#[test]
fn missing_device_or_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut cam = StillFrameCamera::new().with_front(dir.path().join("absent.png"));

    let front = pollster::block_on(
        cam.acquire_camera_stream(Facing::Front, StreamConstraints::default()),
    );
    assert_eq!(front.unwrap_err(), DeviceError::NotFound);

    let back = pollster::block_on(
        cam.acquire_camera_stream(Facing::Back, StreamConstraints::default()),
    );
    assert_eq!(back.unwrap_err(), DeviceError::NotFound);
    assert_eq!(cam.active_tracks(), 0);
}

#[test]
fn undecodable_frame_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.png");
    std::fs::write(&path, b"definitely not a png").unwrap();
    let mut cam = StillFrameCamera::new().with_front(path);

    let err = pollster::block_on(
        cam.acquire_camera_stream(Facing::Front, StreamConstraints::default()),
    )
    .unwrap_err();
    assert!(matches!(err, DeviceError::Unavailable(_)), "{err:?}");
}

#[test]
fn oversized_frames_are_fitted_to_constraints() {
    let dir = tempfile::tempdir().unwrap();
    let mut cam = StillFrameCamera::new().with_front(write_frame(dir.path(), "big.png", 400, 100));
    let constraints = StreamConstraints {
        ideal_width: 200,
        ideal_height: 200,
    };

    let stream = pollster::block_on(cam.acquire_camera_stream(Facing::Front, constraints)).unwrap();
    assert_eq!(stream.resolution(), (200, 50));
    cam.release_stream(stream);
}

#[test]
fn capture_encodes_jpeg_at_stream_size() {
    let dir = tempfile::tempdir().unwrap();
    let mut cam = StillFrameCamera::new().with_front(write_frame(dir.path(), "f.png", 12, 9));

    let stream = pollster::block_on(
        cam.acquire_camera_stream(Facing::Front, StreamConstraints::default()),
    )
    .unwrap();
    let still = pollster::block_on(cam.capture_frame(&stream)).unwrap();
    assert_eq!(still.media_type(), "image/jpeg");
    assert_eq!((still.width(), still.height()), (12, 9));
    assert_eq!(
        image::guess_format(still.data()).unwrap(),
        image::ImageFormat::Jpeg
    );

    cam.release_stream(stream);
}

#[test]
fn capture_after_release_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cam = StillFrameCamera::new().with_front(write_frame(dir.path(), "f.png", 4, 4));
    let stream = pollster::block_on(
        cam.acquire_camera_stream(Facing::Front, StreamConstraints::default()),
    )
    .unwrap();

    let stale = FrameStream {
        id: stream.id,
        facing: stream.facing,
        frame: stream.frame.clone(),
    };
    cam.release_stream(stream);

    let err = pollster::block_on(cam.capture_frame(&stale)).unwrap_err();
    assert!(err.is_device_error());
}
