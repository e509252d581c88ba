//! Frame statistics overlay.
//!
//! [`Stats`] counts frames and, once per sampling window, computes frames per
//! second and the duration of the last frame. The summary goes to whatever
//! [`StatsDisplay`] is attached: the window title natively, a DOM element on
//! the web.

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::window::Window;

/// Receives the overlay text whenever a new sample is available.
pub trait StatsDisplay {
    fn show(&mut self, text: &str);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatsSample {
    pub fps: f32,
    pub ms: f32,
    pub min_fps: f32,
    pub max_fps: f32,
}

impl StatsSample {
    pub fn summary(&self) -> String {
        format!(
            "{:.0} FPS ({:.0}-{:.0}) | {:.1} MS",
            self.fps, self.min_fps, self.max_fps, self.ms
        )
    }
}

pub struct Stats {
    frames: u32,
    window: Duration,
    window_start: Instant,
    last_frame: Instant,
    last_sample: Option<StatsSample>,
    display: Option<Box<dyn StatsDisplay>>,
}

impl Stats {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            frames: 0,
            window: Duration::from_secs(1),
            window_start: start,
            last_frame: start,
            last_sample: None,
            display: None,
        }
    }

    pub fn attach(&mut self, display: Box<dyn StatsDisplay>) {
        self.display = Some(display);
    }

    pub fn last_sample(&self) -> Option<StatsSample> {
        self.last_sample
    }

    /// Count a frame rendered at `now`. Call once per rendered frame.
    pub fn update_at(&mut self, now: Instant) -> Option<StatsSample> {
        self.frames += 1;
        let ms = now.duration_since(self.last_frame).as_secs_f32() * 1000.0;
        self.last_frame = now;

        let elapsed = now.duration_since(self.window_start);
        if elapsed < self.window {
            return None;
        }

        let fps = self.frames as f32 / elapsed.as_secs_f32();
        let (min_fps, max_fps) = match self.last_sample {
            Some(prev) => (prev.min_fps.min(fps), prev.max_fps.max(fps)),
            None => (fps, fps),
        };
        let sample = StatsSample {
            fps,
            ms,
            min_fps,
            max_fps,
        };
        self.frames = 0;
        self.window_start = now;
        self.last_sample = Some(sample);
        if let Some(display) = self.display.as_mut() {
            display.show(&sample.summary());
        }
        log::debug!("{}", sample.summary());
        Some(sample)
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

/// Shows stats in the title bar next to the application name.
pub struct WindowTitleDisplay {
    window: Arc<Window>,
    title: String,
}

impl WindowTitleDisplay {
    pub fn new(window: Arc<Window>, title: impl Into<String>) -> Self {
        Self {
            window,
            title: title.into(),
        }
    }
}

impl StatsDisplay for WindowTitleDisplay {
    fn show(&mut self, text: &str) {
        self.window.set_title(&format!("{} | {}", self.title, text));
    }
}

/// Shows stats in a `div` appended to the page's container element.
#[cfg(target_arch = "wasm32")]
pub struct DomDisplay {
    element: web_sys::Element,
}

#[cfg(target_arch = "wasm32")]
impl DomDisplay {
    pub const CONTAINER_SELECTOR: &'static str = "#container";

    /// Create the overlay element and append it to the container.
    pub fn attach_to_container() -> anyhow::Result<Self> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| anyhow::anyhow!("no document available"))?;
        let container = document
            .query_selector(Self::CONTAINER_SELECTOR)
            .map_err(|e| anyhow::anyhow!("invalid selector: {:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("missing {} element", Self::CONTAINER_SELECTOR))?;
        let element = document
            .create_element("div")
            .map_err(|e| anyhow::anyhow!("could not create stats element: {:?}", e))?;
        element.set_class_name("stats");
        container
            .append_child(&element)
            .map_err(|e| anyhow::anyhow!("could not attach stats element: {:?}", e))?;
        Ok(Self { element })
    }
}

#[cfg(target_arch = "wasm32")]
impl StatsDisplay for DomDisplay {
    fn show(&mut self, text: &str) {
        self.element.set_text_content(Some(text));
    }
}
