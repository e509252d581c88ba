use cgmath::{InnerSpace, Vector3, Zero};
use wgpu::util::DeviceExt;

use crate::data_structures::{scene_graph::Light, transform::Transform};

/// GPU resources holding the scene's light rig.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = LightUniform::default();
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write<'a>(
        &mut self,
        queue: &wgpu::Queue,
        lights: impl IntoIterator<Item = (&'a Light, Transform)>,
    ) {
        self.uniform = LightUniform::from_lights(lights);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

/// One hemisphere, one directional and one point light.
///
/// Every `vec3` is followed by a scalar so each row fills 16 bytes as WGSL
/// uniform layout requires. A light kind missing from the scene has zero
/// intensity; extra lights of a kind are ignored.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub sky_color: [f32; 3],
    pub hemisphere_intensity: f32,
    pub ground_color: [f32; 3],
    _padding: u32,
    pub hemisphere_direction: [f32; 3],
    _padding2: u32,
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    pub directional_direction: [f32; 3],
    _padding3: u32,
    pub point_color: [f32; 3],
    pub point_intensity: f32,
    pub point_position: [f32; 3],
    pub point_decay: f32,
}

impl Default for LightUniform {
    fn default() -> Self {
        Self {
            sky_color: [0.0; 3],
            hemisphere_intensity: 0.0,
            ground_color: [0.0; 3],
            _padding: 0,
            hemisphere_direction: [0.0, 1.0, 0.0],
            _padding2: 0,
            directional_color: [0.0; 3],
            directional_intensity: 0.0,
            directional_direction: [0.0, 1.0, 0.0],
            _padding3: 0,
            point_color: [0.0; 3],
            point_intensity: 0.0,
            point_position: [0.0; 3],
            point_decay: 2.0,
        }
    }
}

impl LightUniform {
    pub fn from_lights<'a>(lights: impl IntoIterator<Item = (&'a Light, Transform)>) -> Self {
        let mut uniform = Self::default();
        let (mut hemisphere, mut directional, mut point) = (false, false, false);
        for (light, world) in lights {
            match light {
                Light::Hemisphere {
                    sky,
                    ground,
                    intensity,
                } if !hemisphere => {
                    uniform.sky_color = sky.to_array();
                    uniform.ground_color = ground.to_array();
                    uniform.hemisphere_intensity = *intensity;
                    uniform.hemisphere_direction = direction_to(world.position);
                    hemisphere = true;
                }
                Light::Directional { color, intensity } if !directional => {
                    uniform.directional_color = color.to_array();
                    uniform.directional_intensity = *intensity;
                    uniform.directional_direction = direction_to(world.position);
                    directional = true;
                }
                Light::Point {
                    color,
                    intensity,
                    decay,
                } if !point => {
                    uniform.point_color = color.to_array();
                    uniform.point_intensity = *intensity;
                    uniform.point_position = world.position.into();
                    uniform.point_decay = *decay;
                    point = true;
                }
                other => log::warn!("Only one light of each kind is shaded, ignoring {:?}", other),
            }
        }
        uniform
    }
}

/// Unit vector from the origin towards `position`, +y for the origin itself.
fn direction_to(position: Vector3<f32>) -> [f32; 3] {
    if position.is_zero() {
        return [0.0, 1.0, 0.0];
    }
    position.normalize().into()
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Uniform Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
