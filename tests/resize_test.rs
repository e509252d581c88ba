use map_app::{
    MapApp, SceneConfig, Viewport,
    viewport::{DrawingBuffer, MAX_PIXEL_RATIO, drawing_buffer_size},
};

use crate::common::test_utils::{RecordingRenderer, assert_close};

mod common;

fn app() -> MapApp {
    MapApp::new(SceneConfig::default(), Viewport::new(640.0, 480.0, 1.0))
}

#[test]
fn should_match_camera_aspect_and_renderer_size() {
    let mut app = app();
    let mut renderer = RecordingRenderer::new();

    for (width, height) in [(1024.0, 768.0), (300.0, 900.0), (1.0, 1.0), (1920.0, 1080.0)] {
        app.on_resize(Viewport::new(width, height, 1.0), &mut renderer);
        assert_close(app.camera().projection.aspect(), (width / height) as f32, 1e-6);
        assert_eq!(renderer.size, Some((width, height)));
        assert_eq!(app.viewport(), Viewport::new(width, height, 1.0));
    }
}

#[test]
fn should_be_idempotent() {
    let mut app = app();
    let mut renderer = RecordingRenderer::new();
    let viewport = Viewport::new(1280.0, 720.0, 1.5);

    app.on_resize(viewport, &mut renderer);
    let projection = app.camera().projection.clone();
    let size = renderer.size;
    let ratio = renderer.pixel_ratio;

    app.on_resize(viewport, &mut renderer);
    assert_eq!(app.camera().projection, projection);
    assert_eq!(renderer.size, size);
    assert_eq!(renderer.pixel_ratio, ratio);
    assert_eq!(app.viewport(), viewport);
}

#[test]
fn should_clamp_pixel_ratio() {
    let mut app = app();
    let mut renderer = RecordingRenderer::new();

    for (device_ratio, expected) in [(1.0, 1.0), (1.5, 1.5), (2.0, 2.0), (3.0, 2.0), (4.5, 2.0)] {
        app.on_resize(Viewport::new(800.0, 600.0, device_ratio), &mut renderer);
        let ratio = renderer.pixel_ratio.expect("pixel ratio set");
        assert_eq!(ratio, expected);
        assert!(ratio <= MAX_PIXEL_RATIO);
    }
}

#[test]
fn should_ignore_empty_viewports() {
    let mut app = app();
    let mut renderer = RecordingRenderer::new();
    app.on_resize(Viewport::new(800.0, 400.0, 1.0), &mut renderer);

    app.on_resize(Viewport::new(0.0, 400.0, 1.0), &mut renderer);
    app.on_resize(Viewport::new(800.0, 0.0, 1.0), &mut renderer);

    assert_eq!(renderer.set_size_calls, 1);
    assert_eq!(renderer.size, Some((800.0, 400.0)));
    assert_close(app.camera().projection.aspect(), 2.0, 1e-6);
}

#[test]
fn should_floor_drawing_buffer_size() {
    assert_eq!(drawing_buffer_size(800.0, 600.0, 1.0), (800, 600));
    assert_eq!(drawing_buffer_size(800.0, 600.0, 2.0), (1600, 1200));
    assert_eq!(drawing_buffer_size(333.0, 101.0, 1.5), (499, 151));
    // Never zero, even for tiny viewports.
    assert_eq!(drawing_buffer_size(0.2, 0.2, 1.0), (1, 1));
}

#[test]
fn should_keep_aspect_after_frames() {
    let mut app = app();
    let mut renderer = RecordingRenderer::new();
    let scheduler = common::test_utils::CountingScheduler::new();

    app.on_resize(Viewport::new(1600.0, 400.0, 1.0), &mut renderer);
    for _ in 0..3 {
        app.frame(&mut renderer, &scheduler).expect("frame renders");
    }
    assert_close(app.camera().projection.aspect(), 4.0, 1e-6);
}

#[test]
fn should_size_to_host_dimensions() {
    let mut app = app();
    let mut renderer = RecordingRenderer::new();

    // The browser window's inner size replaces whatever the canvas reported.
    let viewport = Viewport::new(300.0, 150.0, 2.0).with_size(1280.0, 720.0);
    app.on_resize(viewport, &mut renderer);

    assert_eq!(renderer.size, Some((1280.0, 720.0)));
    assert_eq!(renderer.pixel_ratio, Some(2.0));
    assert_close(app.camera().projection.aspect(), 1280.0 / 720.0, 1e-6);
}

#[test]
fn should_reconfigure_once_per_resize() {
    let mut buffer = DrawingBuffer::new(640.0, 480.0);
    assert_eq!(buffer.take_pending(), None);

    buffer.set_size(1024.0, 768.0);
    buffer.set_pixel_ratio(3.0);
    assert!(buffer.is_pending());

    let expected = drawing_buffer_size(1024.0, 768.0, MAX_PIXEL_RATIO);
    assert_eq!(buffer.device_size(), expected);
    assert_eq!(buffer.take_pending(), Some(expected));
    assert_eq!(buffer.take_pending(), None);
    assert_eq!(buffer.logical_size(), (1024.0, 768.0));
    assert_eq!(buffer.pixel_ratio(), MAX_PIXEL_RATIO);
}
