use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::{GeometryVertex, Vertex},
    material::GradientMaterial,
};

/// Layouts and shader for the screen-space gradient backdrop.
///
/// The backdrop shares the scene's render pass. Its depth state comes from
/// the gradient material, so a pipeline is built per backdrop.
#[derive(Debug)]
pub struct BackgroundPipeline {
    pub layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
}

impl BackgroundPipeline {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("gradient_bind_group_layout"),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Background Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        Self {
            layout,
            pipeline_layout,
            color_format,
        }
    }

    pub fn mk_pipeline(&self, device: &wgpu::Device, material: &GradientMaterial) -> wgpu::RenderPipeline {
        let shader = wgpu::ShaderModuleDescriptor {
            label: Some("Background Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("background.wgsl").into()),
        };
        crate::pipelines::basic::mk_render_pipeline(
            device,
            &self.pipeline_layout,
            self.color_format,
            wgpu::PrimitiveTopology::TriangleList,
            None,
            Some(material.depth_stencil()),
            &[GeometryVertex::desc()],
            shader,
        )
    }

    pub fn mk_bind_group(&self, device: &wgpu::Device, material: &GradientMaterial) -> wgpu::BindGroup {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Gradient Uniform Buffer"),
            contents: bytemuck::cast_slice(&[material.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("gradient_bind_group"),
        })
    }
}
