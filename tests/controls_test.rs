use std::f32::consts::FRAC_PI_2;

use map_app::{
    MapApp, SceneConfig, Viewport,
    cgmath::{InnerSpace, MetricSpace, Point3},
    config::ControlsConfig,
    controls::Spherical,
};
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceId, ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
};

use crate::common::test_utils::{CountingScheduler, RecordingRenderer, assert_close};

mod common;

fn app_with(controls: ControlsConfig) -> MapApp {
    let config = SceneConfig::default().with_controls(controls);
    MapApp::new(config, Viewport::new(800.0, 600.0, 1.0))
}

fn app() -> MapApp {
    app_with(ControlsConfig::default())
}

fn step(app: &mut MapApp) {
    let mut renderer = RecordingRenderer::new();
    let scheduler = CountingScheduler::new();
    app.frame(&mut renderer, &scheduler).expect("frame renders");
}

fn device() -> DeviceId {
    // SAFETY: only used as an opaque identifier in synthetic events.
    unsafe { DeviceId::dummy() }
}

fn drag(app: &mut MapApp, button: MouseButton, from: (f64, f64), to: (f64, f64)) {
    let events = [
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(from.0, from.1),
        },
        WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Pressed,
            button,
        },
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(to.0, to.1),
        },
        WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Released,
            button,
        },
    ];
    for event in &events {
        app.handle_window_event(event);
    }
}

fn assert_point_close(actual: Point3<f32>, expected: Point3<f32>) {
    assert!(
        actual.distance(expected) < 1e-4,
        "expected {:?} to be close to {:?}",
        actual,
        expected
    );
}

#[test]
fn should_ignore_pan_when_disabled() {
    let mut app = app();
    let position = app.camera().camera.position;
    let target = app.controls().target;

    app.controls_mut().pan(120.0, -80.0);
    drag(&mut app, MouseButton::Right, (100.0, 100.0), (400.0, 250.0));
    step(&mut app);

    assert_eq!(app.controls().target, target);
    assert_point_close(app.camera().camera.position, position);
    assert_point_close(app.camera().camera.target, target);
}

#[test]
fn should_pan_when_enabled() {
    let mut app = app_with(ControlsConfig {
        enable_pan: true,
        ..ControlsConfig::default()
    });
    let target = app.controls().target;

    app.controls_mut().pan(120.0, 0.0);
    step(&mut app);

    assert!(app.controls().target.distance(target) > 1e-3);
    // Panning moves target and camera together.
    assert_close(
        (app.camera().camera.position - app.controls().target).magnitude(),
        2.0,
        1e-4,
    );
}

#[test]
fn should_rotate_around_target() {
    let mut app = app();
    app.controls_mut().rotate_left(FRAC_PI_2);
    step(&mut app);

    let position = app.camera().camera.position;
    assert_point_close(position, Point3::new(-2.0, 0.0, 0.0));
    assert_point_close(app.camera().camera.target, Point3::new(0.0, 0.0, 0.0));
}

#[test]
fn should_rotate_on_primary_drag() {
    let mut app = app();
    drag(&mut app, MouseButton::Left, (100.0, 300.0), (200.0, 300.0));
    step(&mut app);

    let position = app.camera().camera.position;
    assert!(position.x.abs() > 1e-2);
    assert_close(position.y, 0.0, 1e-4);
    assert_close(position.distance(Point3::new(0.0, 0.0, 0.0)), 2.0, 1e-4);
}

#[test]
fn should_zoom_with_wheel() {
    let mut app = app();
    app.handle_window_event(&WindowEvent::MouseWheel {
        device_id: device(),
        delta: MouseScrollDelta::LineDelta(0.0, 1.0),
        phase: TouchPhase::Moved,
    });
    step(&mut app);
    assert_close(app.camera().camera.position.z, 1.9, 1e-4);

    app.handle_window_event(&WindowEvent::MouseWheel {
        device_id: device(),
        delta: MouseScrollDelta::LineDelta(0.0, -1.0),
        phase: TouchPhase::Moved,
    });
    step(&mut app);
    assert_close(app.camera().camera.position.z, 2.0, 1e-4);
}

#[test]
fn should_clamp_distance() {
    let mut app = app_with(ControlsConfig {
        min_distance: 1.5,
        max_distance: 3.0,
        ..ControlsConfig::default()
    });
    for _ in 0..20 {
        app.controls_mut().wheel(1.0);
    }
    step(&mut app);
    assert_close(app.camera().camera.position.z, 1.5, 1e-4);

    for _ in 0..40 {
        app.controls_mut().wheel(-1.0);
    }
    step(&mut app);
    assert_close(app.camera().camera.position.z, 3.0, 1e-4);
}

#[test]
fn should_prefer_min_distance_when_bounds_are_inverted() {
    let mut app = app_with(ControlsConfig {
        min_distance: 5.0,
        max_distance: 3.0,
        ..ControlsConfig::default()
    });
    step(&mut app);
    assert_close(app.camera().camera.position.z, 5.0, 1e-4);
}

#[test]
fn should_prefer_min_polar_angle_when_bounds_are_inverted() {
    let mut app = app();
    app.controls_mut().min_polar_angle = 1.0;
    app.controls_mut().max_polar_angle = 0.5;
    step(&mut app);

    let position = app.camera().camera.position;
    assert_close(position.y, 2.0 * 1.0f32.cos(), 1e-4);
    assert_close(position.z, 2.0 * 1.0f32.sin(), 1e-4);
}

#[test]
fn should_keep_polar_angle_off_the_poles() {
    let mut app = app();
    app.controls_mut().rotate_up(10.0);
    step(&mut app);

    let position = app.camera().camera.position;
    assert_close(position.y, 2.0, 1e-4);
    let view_proj: [[f32; 4]; 4] = app.camera().view_proj().into();
    assert!(view_proj.iter().flatten().all(|v| v.is_finite()));
}

#[test]
fn should_convert_spherical_coordinates() {
    let spherical = Spherical::from_vector([0.0, 0.0, 2.0].into());
    assert_close(spherical.radius, 2.0, 1e-6);
    assert_close(spherical.phi, FRAC_PI_2, 1e-6);
    assert_close(spherical.theta, 0.0, 1e-6);

    let back = spherical.to_vector();
    assert_close(back.x, 0.0, 1e-5);
    assert_close(back.y, 0.0, 1e-5);
    assert_close(back.z, 2.0, 1e-5);
}

#[test]
fn should_decay_rotation_with_damping() {
    let mut app = app_with(ControlsConfig {
        enable_damping: true,
        damping_factor: 0.5,
        ..ControlsConfig::default()
    });
    app.controls_mut().rotate_left(0.4);

    step(&mut app);
    let first = app.camera().camera.position;
    step(&mut app);
    let second = app.camera().camera.position;

    // Half the delta is applied on the first frame, a quarter on the next.
    let theta = |p: Point3<f32>| p.x.atan2(p.z);
    assert_close(theta(first), -0.2, 1e-4);
    assert_close(theta(second), -0.3, 1e-4);
}
