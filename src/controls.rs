//! Orbit controls: pointer input rotates and zooms the camera around a target.
//!
//! Input is accumulated as it arrives (window events or the `rotate_*`,
//! `dolly_*` and `pan` methods) and applied once per frame in
//! [`OrbitControls::update`]. The primary button rotates, the middle button and
//! the wheel dolly, and the secondary button pans when panning is enabled.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Vector2, Vector3, Zero};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use crate::{
    camera::{Camera, PerspectiveCamera},
    config::ControlsConfig,
};

const EPS: f32 = 1e-6;

/// Spherical coordinates with the polar axis along +y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    /// Polar angle measured from +y.
    pub phi: f32,
    /// Azimuth around +y, measured from +z.
    pub theta: f32,
}

impl Spherical {
    pub fn from_vector(v: Vector3<f32>) -> Self {
        let radius = v.magnitude();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vector(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep phi away from the poles where the view direction degenerates.
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PointerAction {
    Rotate,
    Dolly,
    Pan,
}

#[derive(Debug)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub enable_pan: bool,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vector3<f32>,
    pending_pan: Vector2<f32>,
    element_height: f32,
    action: Option<PointerAction>,
    cursor: Option<PhysicalPosition<f64>>,
}

impl OrbitControls {
    pub fn new(camera: &Camera, config: &ControlsConfig) -> Self {
        Self {
            target: camera.target,
            enable_pan: config.enable_pan,
            enable_rotate: config.enable_rotate,
            enable_zoom: config.enable_zoom,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vector3::zero(),
            pending_pan: Vector2::zero(),
            element_height: 1.0,
            action: None,
            cursor: None,
        }
    }

    /// Height of the interaction surface in the same unit as cursor positions.
    pub fn set_element_height(&mut self, height: f32) {
        self.element_height = height.max(1.0);
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Move the camera towards the target.
    pub fn dolly_in(&mut self, dolly_scale: f32) {
        self.scale *= dolly_scale;
    }

    /// Move the camera away from the target.
    pub fn dolly_out(&mut self, dolly_scale: f32) {
        self.scale /= dolly_scale;
    }

    /// Queue a pan by a pointer delta in pixels. Ignored while panning is disabled.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.enable_pan {
            return;
        }
        self.pending_pan += Vector2::new(dx, dy) * self.pan_speed;
    }

    /// Rotate by a pointer drag delta in pixels.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32) {
        if !self.enable_rotate {
            return;
        }
        self.rotate_left(2.0 * PI * dx / self.element_height * self.rotate_speed);
        self.rotate_up(2.0 * PI * dy / self.element_height * self.rotate_speed);
    }

    pub fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    /// Apply a wheel step. Positive `delta` zooms in.
    pub fn wheel(&mut self, delta: f32) {
        if !self.enable_zoom || delta == 0.0 {
            return;
        }
        if delta > 0.0 {
            self.dolly_in(self.zoom_scale());
        } else {
            self.dolly_out(self.zoom_scale());
        }
    }

    /// Feed a window event. Returns true if the event was consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let action = match button {
                    MouseButton::Left => PointerAction::Rotate,
                    MouseButton::Middle => PointerAction::Dolly,
                    MouseButton::Right => PointerAction::Pan,
                    _ => return false,
                };
                match state {
                    ElementState::Pressed => self.action = Some(action),
                    ElementState::Released if self.action == Some(action) => self.action = None,
                    ElementState::Released => (),
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let previous = self.cursor.replace(*position);
                match (self.action, previous) {
                    (Some(action), Some(previous)) => {
                        let dx = (position.x - previous.x) as f32;
                        let dy = (position.y - previous.y) as f32;
                        self.drag(action, dx, dy);
                        true
                    }
                    _ => false,
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                self.action = None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                self.wheel(delta);
                true
            }
            _ => false,
        }
    }

    fn drag(&mut self, action: PointerAction, dx: f32, dy: f32) {
        match action {
            PointerAction::Rotate => self.rotate_by_pixels(dx, dy),
            PointerAction::Dolly if self.enable_zoom => {
                if dy > 0.0 {
                    self.dolly_out(self.zoom_scale());
                } else if dy < 0.0 {
                    self.dolly_in(self.zoom_scale());
                }
            }
            PointerAction::Dolly => (),
            PointerAction::Pan => self.pan(dx, dy),
        }
    }

    /// Resolve queued pixel pans into a world-space offset for the current view.
    fn resolve_pan(&mut self, camera: &PerspectiveCamera, distance: f32) {
        if self.pending_pan == Vector2::zero() {
            return;
        }
        let forward = camera.camera.forward();
        let right = forward.cross(camera.camera.up).normalize();
        let up = right.cross(forward).normalize();
        let target_distance = distance * (camera.projection.fovy().0 / 2.0).tan();
        let left = 2.0 * self.pending_pan.x * target_distance / self.element_height;
        let upward = 2.0 * self.pending_pan.y * target_distance / self.element_height;
        self.pan_offset += right * -left + up * upward;
        self.pending_pan = Vector2::zero();
    }

    /// Apply accumulated input to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.camera.position - self.target;
        let mut spherical = Spherical::from_vector(offset);

        if self.enable_pan {
            self.resolve_pan(camera, offset.magnitude());
        } else {
            self.pending_pan = Vector2::zero();
            self.pan_offset = Vector3::zero();
        }

        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };
        spherical.theta += self.spherical_delta.theta * step;
        spherical.phi += self.spherical_delta.phi * step;
        // Bounds may be configured inverted; the lower one wins then.
        spherical.phi = spherical
            .phi
            .min(self.max_polar_angle)
            .max(self.min_polar_angle);
        spherical.make_safe();
        spherical.radius = (spherical.radius * self.scale)
            .min(self.max_distance)
            .max(self.min_distance);

        self.target += self.pan_offset * step;

        let previous = camera.camera.position;
        camera.camera.position = self.target + spherical.to_vector();
        camera.camera.look_at(self.target);

        if self.enable_damping {
            self.spherical_delta.theta *= 1.0 - self.damping_factor;
            self.spherical_delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;

        (camera.camera.position - previous).magnitude2() > EPS
    }
}
