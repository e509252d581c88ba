//! Application event loop.
//!
//! Bridges winit to [`MapApp`]: creates the window (the page's `canvas.webgl`
//! element on the web, sized to the browser window), initialises the GPU
//! asynchronously, forwards input to the orbit controls, resizes on window
//! changes and runs one frame per redraw request.
//!
//! # Lifecycle
//!
//! 1. `resumed` creates the window and starts GPU initialisation
//! 2. Native blocks on initialisation; wasm spawns it and receives a
//!    [`FlowEvent::Initialized`] user event when done
//! 3. The app is sized to the window and the first redraw is requested
//! 4. Every `RedrawRequested` runs [`MapApp::frame`], which requests the next one

use std::{fmt::Debug, sync::Arc};

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    app::MapApp,
    config::SceneConfig,
    context::Context,
    render::WgpuRenderer,
    viewport::Viewport,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Everything that exists once the GPU is up.
pub struct AppState {
    window: Arc<Window>,
    renderer: WgpuRenderer,
    app: MapApp,
}

impl AppState {
    async fn new(window: Arc<Window>, config: SceneConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window.clone()).await?;
        let renderer = WgpuRenderer::new(ctx);
        let app = MapApp::new(config, Viewport::from_window(&window));
        Ok(Self {
            window,
            renderer,
            app,
        })
    }

    fn resize(&mut self) {
        #[allow(unused_mut)]
        let mut viewport = Viewport::from_window(&self.window);

        // The canvas follows the browser window rather than its own layout size.
        #[cfg(target_arch = "wasm32")]
        if let Some((width, height)) = browser_inner_size() {
            let _ = self
                .window
                .request_inner_size(winit::dpi::LogicalSize::new(width, height));
            viewport = viewport.with_size(width, height);
        }

        self.app.on_resize(viewport, &mut self.renderer);
    }

    fn attach_stats(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let title = self.app.config().window_title.clone();
            self.app.attach_stats_display(Box::new(
                crate::stats::WindowTitleDisplay::new(self.window.clone(), title),
            ));
        }

        #[cfg(target_arch = "wasm32")]
        match crate::stats::DomDisplay::attach_to_container() {
            Ok(display) => self.app.attach_stats_display(Box::new(display)),
            Err(e) => log::warn!("Stats overlay unavailable: {:#}", e),
        }
    }

    /// Size, decorate and kick off the loop once initialisation has finished.
    fn start(&mut self) {
        self.resize();
        self.attach_stats();
        self.window.request_redraw();
    }

    fn redraw(&mut self) {
        match self.app.frame(&mut self.renderer, self.window.as_ref()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                self.resize();
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
    // Taken once the window exists.
    config: Option<SceneConfig>,
    state: Option<AppState>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            config: Some(config),
            state: None,
        })
    }
}

pub enum FlowEvent {
    #[allow(dead_code)]
    Initialized(Box<AppState>),
    #[allow(dead_code)]
    Exit,
    /// The browser window changed size.
    #[allow(dead_code)]
    HostResized,
}

impl Debug for FlowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized(_) => f.write_str("Initialized"),
            Self::Exit => f.write_str("Exit"),
            Self::HostResized => f.write_str("HostResized"),
        }
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(config) = self.config.take() else {
            // Already initialised; resumption after suspend keeps the existing state.
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title(&config.window_title);

        #[cfg(target_arch = "wasm32")]
        {
            use winit::platform::web::WindowAttributesExtWebSys;

            match mk_canvas() {
                Ok(canvas) => window_attributes = window_attributes.with_canvas(Some(canvas)),
                Err(e) => {
                    log::error!("Could not find or create the canvas: {:?}", e);
                    event_loop.exit();
                    return;
                }
            }
            if let Err(e) = listen_for_host_resize(self.proxy.clone()) {
                log::warn!("Browser resize events unavailable: {:?}", e);
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Could not create a window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let init_future = AppState::new(window, config);

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok(mut state) => {
                    state.start();
                    self.state = Some(state);
                }
                Err(e) => {
                    log::error!("Initialisation failed: {:#}", e);
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok(state) => FlowEvent::Initialized(Box::new(state)),
                    Err(e) => {
                        log::error!("Initialisation failed: {:#}", e);
                        FlowEvent::Exit
                    }
                };
                if proxy.send_event(event).is_err() {
                    log::error!("Event loop closed before initialisation finished");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                let mut state = *state;
                state.start();
                self.state = Some(state);
            }
            FlowEvent::Exit => event_loop.exit(),
            FlowEvent::HostResized => {
                if let Some(state) = &mut self.state {
                    state.resize();
                }
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        if state.app.handle_window_event(&event) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => state.resize(),
            WindowEvent::RedrawRequested => state.redraw(),
            _ => {}
        }
    }
}

/// The page's `canvas.webgl`, or a new one appended to `#container` when the page has none.
#[cfg(target_arch = "wasm32")]
fn mk_canvas() -> Result<web_sys::HtmlCanvasElement, JsValue> {
    use wasm_bindgen::JsCast;

    const CANVAS_SELECTOR: &str = "canvas.webgl";
    const CONTAINER_ID: &str = "container";

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    if let Some(existing) = document.query_selector(CANVAS_SELECTOR)? {
        log::debug!("Using existing {}", CANVAS_SELECTOR);
        return existing
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .map_err(JsValue::from);
    }

    let canvas: web_sys::HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_class_name("webgl");
    let container = document
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| JsValue::from_str("missing #container element"))?;
    container.append_child(&canvas)?;
    Ok(canvas)
}

/// Inner size of the browser window in CSS pixels.
#[cfg(target_arch = "wasm32")]
fn browser_inner_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Forward the browser's `resize` events to the event loop.
#[cfg(target_arch = "wasm32")]
fn listen_for_host_resize(
    proxy: winit::event_loop::EventLoopProxy<FlowEvent>,
) -> Result<(), JsValue> {
    use wasm_bindgen::{JsCast, closure::Closure};

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
    let on_resize = Closure::<dyn FnMut()>::new(move || {
        if proxy.send_event(FlowEvent::HostResized).is_err() {
            log::debug!("Event loop closed, dropping browser resize");
        }
    });
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    // Lives as long as the page.
    on_resize.forget();
    Ok(())
}

/// Open the window and run the scene until it is closed.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let env = env_logger::Env::default().default_filter_or("info");
        if let Err(e) = env_logger::Builder::from_env(env).try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::log_1(&format!("Could not initialize logger: {}", e).into());
        }
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
