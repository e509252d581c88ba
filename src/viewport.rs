//! Viewport sizing shared by the camera, the controls and the renderer.

use winit::window::Window;

/// Upper bound for the pixel ratio handed to the renderer.
///
/// High-density displays report ratios of 3 or more; rendering at that density
/// costs far more than it adds for a wireframe scene.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

/// Size of the drawable area in logical pixels plus the host's device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Read the current inner size and scale factor of `window`.
    ///
    /// winit reports physical pixels; the viewport keeps logical ones so the
    /// pixel ratio can be clamped independently of the host.
    pub fn from_window(window: &Window) -> Self {
        let scale_factor = window.scale_factor();
        let size = window.inner_size().to_logical::<f64>(scale_factor);
        Self::new(size.width, size.height, scale_factor)
    }

    /// The same viewport with its logical size replaced by the host's.
    pub fn with_size(self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn aspect(&self) -> f32 {
        (self.width / self.height) as f32
    }

    /// Pixel ratio clamped to [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f64 {
        clamp_pixel_ratio(self.device_pixel_ratio)
    }
}

pub fn clamp_pixel_ratio(device_pixel_ratio: f64) -> f64 {
    device_pixel_ratio.min(MAX_PIXEL_RATIO)
}

/// Size of the drawing buffer in device pixels for a logical size and pixel ratio.
///
/// Never returns a zero dimension, the surface cannot be configured with one.
pub fn drawing_buffer_size(width: f64, height: f64, pixel_ratio: f64) -> (u32, u32) {
    let w = (width * pixel_ratio).floor().max(1.0) as u32;
    let h = (height * pixel_ratio).floor().max(1.0) as u32;
    (w, h)
}

/// Logical output size and pixel ratio of a renderer.
///
/// Changes are only recorded; the resulting drawing-buffer size is taken once
/// per frame so a resize followed by a pixel-ratio change reconfigures the
/// surface a single time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawingBuffer {
    width: f64,
    height: f64,
    pixel_ratio: f64,
    dirty: bool,
}

impl DrawingBuffer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: 1.0,
            dirty: false,
        }
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.dirty = true;
    }

    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = clamp_pixel_ratio(ratio);
        self.dirty = true;
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Drawing-buffer size in device pixels for the current settings.
    pub fn device_size(&self) -> (u32, u32) {
        drawing_buffer_size(self.width, self.height, self.pixel_ratio)
    }

    pub fn is_pending(&self) -> bool {
        self.dirty
    }

    /// The size to configure the surface with, if anything changed since the last call.
    pub fn take_pending(&mut self) -> Option<(u32, u32)> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.device_size())
    }
}
