//! map-app
//!
//! A single static 3D scene rendered with wgpu, natively in a window or in
//! the browser via WASM: a wireframe sphere lit by a hemisphere, a
//! directional and a point light, viewed through a perspective camera with
//! orbit controls and a frame-rate overlay.
//!
//! High-level modules
//! - `app`: the application root owning scene, camera, controls and stats
//! - `camera`: camera, projection and their GPU uniforms
//! - `clock`: per-frame delta time
//! - `color`: linear colours built from sRGB hex and HSL values
//! - `config`: every scene constant, with defaults and builders
//! - `context`: GPU device, queue and surface
//! - `controls`: orbit controls driven by pointer and wheel input
//! - `data_structures`: geometry, materials, transforms and the scene graph
//! - `flow`: the winit event loop that hosts the app
//! - `objects`: the sphere, the light rig and the gradient backdrop
//! - `pipelines`: Phong, light and backdrop render pipelines
//! - `render`: renderer and frame scheduler seams and the wgpu renderer
//! - `stats`: the frame-rate overlay
//! - `viewport`: logical size, device pixel ratio and drawing-buffer maths
//!

pub mod app;
pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod flow;
pub mod objects;
pub mod pipelines;
pub mod render;
pub mod stats;
pub mod viewport;

// Re-exports commonly used types for convenience in downstream code.
pub use app::MapApp;
pub use cgmath;
pub use config::SceneConfig;
pub use viewport::Viewport;
pub use wgpu;
pub use winit::event::WindowEvent;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    flow::run(SceneConfig::default()).map_err(|e| JsValue::from_str(&format!("{:#}", e)))
}
