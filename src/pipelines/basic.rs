use wgpu::util::DeviceExt;

use crate::data_structures::{
    geometry::{GeometryVertex, Vertex},
    material::{MaterialUniform, PhongMaterial},
    texture::Texture,
    transform::TransformRaw,
};

/// Phong pipelines for both topologies a mesh can be drawn with.
#[derive(Debug)]
pub struct PhongPipelines {
    pub fill: wgpu::RenderPipeline,
    pub wireframe: wgpu::RenderPipeline,
    pub material_layout: wgpu::BindGroupLayout,
}

impl PhongPipelines {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let material_layout = mk_material_layout(device);
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Phong Pipeline Layout"),
            bind_group_layouts: &[
                camera_bind_group_layout,
                light_bind_group_layout,
                &material_layout,
            ],
            push_constant_ranges: &[],
        });
        let shader = || wgpu::ShaderModuleDescriptor {
            label: Some("Phong Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("phong.wgsl").into()),
        };
        let depth = || {
            Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            })
        };
        let vertex_layouts = [GeometryVertex::desc(), TransformRaw::desc()];

        let fill = mk_render_pipeline(
            device,
            &layout,
            color_format,
            wgpu::PrimitiveTopology::TriangleList,
            Some(wgpu::Face::Back),
            depth(),
            &vertex_layouts,
            shader(),
        );
        // Lines have no facing, so nothing is culled.
        let wireframe = mk_render_pipeline(
            device,
            &layout,
            color_format,
            wgpu::PrimitiveTopology::LineList,
            None,
            depth(),
            &vertex_layouts,
            shader(),
        );

        Self {
            fill,
            wireframe,
            material_layout,
        }
    }

    pub fn for_material(&self, material: &PhongMaterial) -> &wgpu::RenderPipeline {
        if material.wireframe {
            &self.wireframe
        } else {
            &self.fill
        }
    }

    pub fn mk_material_bind_group(
        &self,
        device: &wgpu::Device,
        material: &PhongMaterial,
    ) -> wgpu::BindGroup {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Uniform Buffer"),
            contents: bytemuck::cast_slice(&[material.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("material_bind_group"),
        })
    }
}

fn mk_material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(
                    std::mem::size_of::<MaterialUniform>() as u64
                ),
            },
            count: None,
        }],
        label: Some("material_bind_group_layout"),
    })
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    depth_stencil: Option<wgpu::DepthStencilState>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
