//! Scene configuration.
//!
//! Every constant the scene is composed from lives here. [`SceneConfig::default`]
//! reproduces the stock scene; the `with_*` methods tweak it before it is handed
//! to [`crate::app::MapApp::new`] or [`crate::flow::run`].

use cgmath::{Deg, Point3, Vector3};

use crate::color::Color;

#[derive(Clone, Debug)]
pub struct CameraConfig {
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy: Deg(75.0),
            znear: 0.1,
            zfar: 100.0,
            position: Point3::new(0.0, 0.0, 2.0),
            target: Point3::new(0.0, 0.0, 0.0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct HemisphereLightConfig {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
}

#[derive(Clone, Debug)]
pub struct DirectionalLightConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
}

#[derive(Clone, Debug)]
pub struct PointLightConfig {
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
    pub decay: f32,
}

#[derive(Clone, Debug)]
pub struct LightRigConfig {
    pub hemisphere: HemisphereLightConfig,
    pub directional: DirectionalLightConfig,
    pub point: PointLightConfig,
}

impl Default for LightRigConfig {
    fn default() -> Self {
        Self {
            hemisphere: HemisphereLightConfig {
                sky: Color::from_hsl(0.6, 1.0, 0.6),
                ground: Color::from_hsl(0.095, 1.0, 0.75),
                intensity: 1.0,
                position: Vector3::new(0.0, 50.0, 0.0),
            },
            directional: DirectionalLightConfig {
                color: Color::from_hsl(0.1, 1.0, 0.95),
                intensity: 1.0,
                position: Vector3::new(-1.0, 1.75, 1.0) * 30.0,
            },
            point: PointLightConfig {
                color: Color::from_hex(0xffffff),
                intensity: 0.1,
                position: Vector3::new(2.0, 3.0, 4.0),
                decay: 2.0,
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct SphereConfig {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    pub wireframe: bool,
    /// Rotation around the y axis in radians per second, applied in `update`.
    pub spin: f32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            width_segments: 20,
            height_segments: 20,
            color: Color::from_hex(0xffffff),
            specular: Color::from_hex(0xabb7c7),
            shininess: 5.0,
            wireframe: true,
            spin: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BackdropConfig {
    /// Colour at the centre of the screen.
    pub light: Color,
    /// Colour towards the corners.
    pub dark: Color,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            light: Color::from_srgb(0.925_490_2, 1.0, 1.0),
            dark: Color::from_srgb(0.258_823_53, 0.380_392_16, 0.560_784_3),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ControlsConfig {
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
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            enable_pan: false,
            enable_rotate: true,
            enable_zoom: true,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub window_title: String,
    pub background: Color,
    /// Draw the gradient backdrop behind the scene.
    pub gradient_background: bool,
    pub backdrop: BackdropConfig,
    pub camera: CameraConfig,
    pub lights: LightRigConfig,
    pub sphere: SphereConfig,
    pub controls: ControlsConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_title: "map-app".to_string(),
            background: Color::from_hex(0x496c99),
            gradient_background: false,
            backdrop: BackdropConfig::default(),
            camera: CameraConfig::default(),
            lights: LightRigConfig::default(),
            sphere: SphereConfig::default(),
            controls: ControlsConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_gradient_background(mut self, enabled: bool) -> Self {
        self.gradient_background = enabled;
        self
    }

    pub fn with_camera(mut self, camera: CameraConfig) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_lights(mut self, lights: LightRigConfig) -> Self {
        self.lights = lights;
        self
    }

    pub fn with_sphere(mut self, sphere: SphereConfig) -> Self {
        self.sphere = sphere;
        self
    }

    pub fn with_controls(mut self, controls: ControlsConfig) -> Self {
        self.controls = controls;
        self
    }
}
