#![allow(dead_code)]

use std::cell::Cell;

use map_app::{
    camera::PerspectiveCamera,
    data_structures::scene_graph::Scene,
    render::{FrameScheduler, SceneRenderer},
};

/// Renderer double that records what the render loop asked of it.
#[derive(Default)]
pub struct RecordingRenderer {
    pub size: Option<(f64, f64)>,
    pub pixel_ratio: Option<f64>,
    pub set_size_calls: u32,
    pub set_pixel_ratio_calls: u32,
    pub render_calls: u32,
    /// Addresses of the scene and camera passed to each render.
    pub rendered: Vec<(usize, usize)>,
    /// Mesh count seen by each render.
    pub mesh_counts: Vec<usize>,
    /// When set, every render fails with this error.
    pub fail_with: Option<wgpu::SurfaceError>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: wgpu::SurfaceError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }
}

impl SceneRenderer for RecordingRenderer {
    fn set_size(&mut self, width: f64, height: f64) {
        self.size = Some((width, height));
        self.set_size_calls += 1;
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = Some(ratio);
        self.set_pixel_ratio_calls += 1;
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), wgpu::SurfaceError> {
        self.render_calls += 1;
        self.rendered.push((
            scene as *const Scene as usize,
            camera as *const PerspectiveCamera as usize,
        ));
        self.mesh_counts.push(scene.meshes().len());
        match &self.fail_with {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// Scheduler double counting frame requests.
#[derive(Default)]
pub struct CountingScheduler {
    requests: Cell<u32>,
}

impl CountingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> u32 {
        self.requests.get()
    }
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&self) {
        self.requests.set(self.requests.get() + 1);
    }
}

pub fn assert_close(actual: f32, expected: f32, tolerance: f32) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}
