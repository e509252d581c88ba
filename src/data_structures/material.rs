//! Shading parameters for meshes and the backdrop.

use crate::color::Color;

/// Blinn-Phong material lit by the scene's light rig.
#[derive(Clone, Debug, PartialEq)]
pub struct PhongMaterial {
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    /// Draw triangle edges as lines instead of filled faces.
    pub wireframe: bool,
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            specular: Color::from_hex(0x111111),
            shininess: 30.0,
            wireframe: false,
        }
    }
}

impl PhongMaterial {
    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            color: self.color.to_array(),
            shininess: self.shininess,
            specular: self.specular.to_array(),
            _padding: 0,
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    color: [f32; 3],
    shininess: f32,
    specular: [f32; 3],
    // Uniforms require 16 byte (4 float) spacing
    _padding: u32,
}

/// Two-colour radial gradient drawn in screen space.
///
/// The colour at a pixel is `mix(light, dark, d²)` where `d` is the pixel's
/// distance from the screen centre in normalised device coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientMaterial {
    pub light: Color,
    pub dark: Color,
    pub depth_write: bool,
    pub depth_test: bool,
}

impl GradientMaterial {
    pub fn new(light: Color, dark: Color) -> Self {
        Self {
            light,
            dark,
            depth_write: false,
            depth_test: false,
        }
    }

    pub fn to_uniform(&self) -> GradientUniform {
        let [lr, lg, lb] = self.light.to_array();
        let [dr, dg, db] = self.dark.to_array();
        GradientUniform {
            light: [lr, lg, lb, 1.0],
            dark: [dr, dg, db, 1.0],
        }
    }

    /// Depth state of a pipeline drawing this material into the scene pass.
    pub fn depth_stencil(&self) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: crate::data_structures::texture::Texture::DEPTH_FORMAT,
            depth_write_enabled: self.depth_write,
            depth_compare: if self.depth_test {
                wgpu::CompareFunction::LessEqual
            } else {
                wgpu::CompareFunction::Always
            },
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    /// Colour the gradient produces at a point in normalised device coordinates.
    pub fn sample(&self, x: f32, y: f32) -> Color {
        let t = x * x + y * y;
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Color::linear(
            mix(self.light.r, self.dark.r),
            mix(self.light.g, self.dark.g),
            mix(self.light.b, self.dark.b),
        )
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GradientUniform {
    light: [f32; 4],
    dark: [f32; 4],
}
