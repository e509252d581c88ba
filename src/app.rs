//! The application root: scene composition, resize handling and the frame loop.
//!
//! [`MapApp`] owns every piece of scene state. Hosts hand it a renderer and a
//! frame scheduler explicitly, which keeps the loop free of ambient globals
//! and lets tests drive it with doubles.

use winit::event::WindowEvent;

use crate::{
    camera::{Camera, PerspectiveCamera, Projection},
    clock::{Clock, FrameTime},
    config::SceneConfig,
    controls::OrbitControls,
    data_structures::scene_graph::{Backdrop, Scene},
    objects::{SphereObject, background, light_rig},
    render::{FrameScheduler, SceneRenderer},
    stats::{Stats, StatsDisplay},
    viewport::Viewport,
};

pub struct MapApp {
    config: SceneConfig,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    stats: Stats,
    clock: Clock,
    viewport: Viewport,
    background: Backdrop,
    last_frame: Option<FrameTime>,
}

impl MapApp {
    /// Compose the scene graph. The renderer is sized separately via [`MapApp::on_resize`].
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        let mut scene = Scene::new(config.background);
        for light in light_rig(&config.lights) {
            scene.add(Box::new(light));
        }
        scene.add(Box::new(SphereObject::new(&config.sphere)));

        let background = background(&config.backdrop);
        if config.gradient_background {
            scene.set_backdrop(Some(background.clone()));
        }

        let camera = Camera::new(config.camera.position, config.camera.target);
        let projection = Projection::new(
            viewport.width.max(1.0) as u32,
            viewport.height.max(1.0) as u32,
            config.camera.fovy,
            config.camera.znear,
            config.camera.zfar,
        );
        let mut controls = OrbitControls::new(&camera, &config.controls);
        controls.set_element_height((viewport.height * viewport.device_pixel_ratio) as f32);

        log::info!(
            "Scene composed with {} nodes, {} mesh(es), {} light(s)",
            scene.node_count(),
            scene.meshes().len(),
            scene.lights().len()
        );

        Self {
            config,
            scene,
            camera: PerspectiveCamera { camera, projection },
            controls,
            stats: Stats::new(),
            clock: Clock::new(),
            viewport,
            background,
            last_frame: None,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The gradient backdrop. Only drawn when attached to the scene.
    pub fn background(&self) -> &Backdrop {
        &self.background
    }

    pub fn last_frame(&self) -> Option<FrameTime> {
        self.last_frame
    }

    pub fn attach_stats_display(&mut self, display: Box<dyn StatsDisplay>) {
        self.stats.attach(display);
    }

    /// Route a window event to the orbit controls. Returns true if consumed.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.controls.handle_window_event(event)
    }

    /// Keep camera aspect and renderer output in step with the viewport.
    ///
    /// Repeating a call with the same viewport leaves all state unchanged.
    pub fn on_resize<R: SceneRenderer + ?Sized>(&mut self, viewport: Viewport, renderer: &mut R) {
        if viewport.is_empty() {
            log::debug!("Ignoring resize to an empty viewport {:?}", viewport);
            return;
        }
        self.viewport = viewport;

        self.camera.projection.set_aspect(viewport.aspect());
        self.controls
            .set_element_height((viewport.height * viewport.device_pixel_ratio) as f32);

        renderer.set_size(viewport.width, viewport.height);
        renderer.set_pixel_ratio(viewport.pixel_ratio());
    }

    /// Run one frame and schedule the next.
    ///
    /// The next frame is requested even when rendering fails so the loop
    /// never stalls; the error is handed back for the host to act on.
    pub fn frame<R, F>(&mut self, renderer: &mut R, scheduler: &F) -> Result<(), wgpu::SurfaceError>
    where
        R: SceneRenderer + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        let time = self.clock.tick();
        self.last_frame = Some(time);

        self.controls.update(&mut self.camera);
        self.scene.update(time.dt);
        self.stats.update_at(time.now);

        let result = renderer.render(&self.scene, &self.camera);

        scheduler.request_frame();
        result
    }
}
