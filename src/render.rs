//! Rendering seams and the wgpu implementation.
//!
//! [`SceneRenderer`] is everything the render loop needs from a renderer:
//! a drawing-buffer size, a pixel ratio and a `render` call. [`FrameScheduler`]
//! asks the host for the next display refresh. [`WgpuRenderer`] implements the
//! renderer on top of a [`Context`]; the winit window implements the scheduler.
//!
//! GPU buffers for meshes are created the first time a mesh is rendered and
//! kept for the lifetime of the renderer, since nodes never change after the
//! scene is composed. Transforms, camera and lights are re-uploaded every frame.

use std::{collections::HashMap, iter};

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    camera::{CameraResources, PerspectiveCamera},
    context::Context,
    data_structures::{
        geometry::Geometry,
        scene_graph::{Backdrop, Mesh, Scene},
    },
    pipelines::{background::BackgroundPipeline, basic::PhongPipelines, light::LightResources},
    viewport::DrawingBuffer,
};

pub trait SceneRenderer {
    /// Set the output size in logical pixels.
    fn set_size(&mut self, width: f64, height: f64);

    /// Set device pixels per logical pixel.
    fn set_pixel_ratio(&mut self, ratio: f64);

    /// Draw one frame of `scene` as seen by `camera`.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), wgpu::SurfaceError>;
}

pub trait FrameScheduler {
    /// Ask for exactly one more frame callback.
    fn request_frame(&self);
}

impl FrameScheduler for Window {
    fn request_frame(&self) {
        self.request_redraw();
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_elements: u32,
    transform_buffer: wgpu::Buffer,
    material: wgpu::BindGroup,
}

struct GpuBackdrop {
    id: u32,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_elements: u32,
    pipeline: wgpu::RenderPipeline,
    gradient: wgpu::BindGroup,
}

fn mk_geometry_buffers(
    device: &wgpu::Device,
    label: &str,
    geometry: &Geometry,
    indices: &[u32],
) -> (wgpu::Buffer, wgpu::Buffer) {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Vertex Buffer", label)),
        contents: bytemuck::cast_slice(&geometry.vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Index Buffer", label)),
        contents: bytemuck::cast_slice(indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    (vertex_buffer, index_buffer)
}

fn upload_mesh(device: &wgpu::Device, phong: &PhongPipelines, mesh: &Mesh) -> GpuMesh {
    let label = format!("mesh {}", mesh.id);
    let indices = if mesh.material.wireframe {
        mesh.geometry.wireframe_indices()
    } else {
        mesh.geometry.indices.clone()
    };
    let (vertex_buffer, index_buffer) = mk_geometry_buffers(device, &label, &mesh.geometry, &indices);
    let transform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{} Transform Buffer", label)),
        size: std::mem::size_of::<crate::data_structures::transform::TransformRaw>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    log::debug!(
        "Uploaded {} with {} vertices and {} indices",
        label,
        mesh.geometry.vertices.len(),
        indices.len()
    );
    GpuMesh {
        vertex_buffer,
        index_buffer,
        num_elements: indices.len() as u32,
        transform_buffer,
        material: phong.mk_material_bind_group(device, &mesh.material),
    }
}

fn upload_backdrop(device: &wgpu::Device, pipeline: &BackgroundPipeline, backdrop: &Backdrop) -> GpuBackdrop {
    let (vertex_buffer, index_buffer) = mk_geometry_buffers(
        device,
        "backdrop",
        &backdrop.geometry,
        &backdrop.geometry.indices,
    );
    GpuBackdrop {
        id: backdrop.id,
        vertex_buffer,
        index_buffer,
        num_elements: backdrop.geometry.indices.len() as u32,
        pipeline: pipeline.mk_pipeline(device, &backdrop.material),
        gradient: pipeline.mk_bind_group(device, &backdrop.material),
    }
}

pub struct WgpuRenderer {
    pub ctx: Context,
    camera: CameraResources,
    light: LightResources,
    phong: PhongPipelines,
    background: BackgroundPipeline,
    meshes: HashMap<u32, GpuMesh>,
    backdrop: Option<GpuBackdrop>,
    buffer: DrawingBuffer,
}

impl WgpuRenderer {
    pub fn new(ctx: Context) -> Self {
        let camera = CameraResources::new(&ctx.device);
        let light = LightResources::new(&ctx.device);
        let phong = PhongPipelines::new(
            &ctx.device,
            ctx.config.format,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );
        let background = BackgroundPipeline::new(&ctx.device, ctx.config.format);
        let buffer = DrawingBuffer::new(ctx.config.width as f64, ctx.config.height as f64);
        Self {
            ctx,
            camera,
            light,
            phong,
            background,
            meshes: HashMap::new(),
            backdrop: None,
            buffer,
        }
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.buffer.pixel_ratio()
    }

    /// Logical output size.
    pub fn size(&self) -> (f64, f64) {
        self.buffer.logical_size()
    }

    /// Drawing buffer size in device pixels, applied at the next frame.
    pub fn drawing_buffer_size(&self) -> (u32, u32) {
        self.buffer.device_size()
    }

    /// Reconfigure the surface if the size or pixel ratio changed since the last frame.
    fn apply_pending_size(&mut self) {
        if let Some((width, height)) = self.buffer.take_pending() {
            log::debug!("Configuring drawing buffer {}x{}", width, height);
            self.ctx.configure(width, height);
        }
    }

    /// Upload anything new and write per-frame uniforms.
    fn prepare(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        let Self {
            ctx,
            camera: camera_resources,
            light,
            phong,
            background,
            meshes,
            backdrop,
            ..
        } = self;

        camera_resources.write(&ctx.queue, camera);
        light.write(&ctx.queue, scene.lights());

        for (mesh, world) in scene.meshes() {
            let gpu = meshes
                .entry(mesh.id)
                .or_insert_with(|| upload_mesh(&ctx.device, phong, mesh));
            ctx.queue
                .write_buffer(&gpu.transform_buffer, 0, bytemuck::cast_slice(&[world.to_raw()]));
        }

        match scene.backdrop() {
            Some(scene_backdrop) if backdrop.as_ref().map(|b| b.id) != Some(scene_backdrop.id) => {
                *backdrop = Some(upload_backdrop(&ctx.device, background, scene_backdrop));
            }
            Some(_) => (),
            None => *backdrop = None,
        }
    }

    fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        scene: &Scene,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.ctx.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        if let Some(backdrop) = &self.backdrop {
            render_pass.set_pipeline(&backdrop.pipeline);
            render_pass.set_bind_group(0, &backdrop.gradient, &[]);
            render_pass.set_vertex_buffer(0, backdrop.vertex_buffer.slice(..));
            render_pass.set_index_buffer(backdrop.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..backdrop.num_elements, 0, 0..1);
        }

        render_pass.set_bind_group(0, &self.camera.bind_group, &[]);
        render_pass.set_bind_group(1, &self.light.bind_group, &[]);
        for (mesh, _) in scene.meshes() {
            let Some(gpu) = self.meshes.get(&mesh.id) else {
                log::warn!("Mesh {} was not uploaded before drawing", mesh.id);
                continue;
            };
            if gpu.num_elements == 0 {
                continue;
            }
            render_pass.set_pipeline(self.phong.for_material(&mesh.material));
            render_pass.set_bind_group(2, &gpu.material, &[]);
            render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, gpu.transform_buffer.slice(..));
            render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..gpu.num_elements, 0, 0..1);
        }
    }

    /// Render one frame offscreen and read it back as an image.
    #[cfg(feature = "integration-tests")]
    pub fn render_to_image(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> anyhow::Result<image::RgbaImage> {
        use anyhow::Context as _;

        use crate::data_structures::texture::Texture;

        self.apply_pending_size();
        self.prepare(scene, camera);
        let (width, height) = self.drawing_buffer_size();
        let target = Texture::create_readback_target(
            &self.ctx.device,
            [width, height],
            self.ctx.config.format,
            "offscreen_target",
        );

        // Rows in a texture-to-buffer copy must be 256-byte aligned.
        let unpadded_bytes_per_row = 4 * width;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;
        let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Offscreen Encoder"),
            });
        self.encode(&mut encoder, &target.view, scene);
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &target.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.ctx.queue.submit(iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.ctx
            .device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(std::time::Duration::from_secs(3)),
            })
            .context("Device poll failed while reading back the frame")?;
        futures::executor::block_on(rx.receive())
            .context("Readback channel closed")?
            .context("Could not map the readback buffer")?;

        let pixels = {
            let data = buffer_slice.get_mapped_range();
            data.chunks(padded_bytes_per_row as usize)
                .flat_map(|row| row[..unpadded_bytes_per_row as usize].iter().copied())
                .collect::<Vec<u8>>()
        };
        output_buffer.unmap();

        image::RgbaImage::from_raw(width, height, pixels)
            .context("Readback size does not match the drawing buffer")
    }
}

impl SceneRenderer for WgpuRenderer {
    fn set_size(&mut self, width: f64, height: f64) {
        self.buffer.set_size(width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.buffer.set_pixel_ratio(ratio);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), wgpu::SurfaceError> {
        self.apply_pending_size();
        self.prepare(scene, camera);

        let Some(surface) = &self.ctx.surface else {
            log::warn!("Render called on a context without a surface");
            return Ok(());
        };
        // Nothing to draw into until the first non-empty resize.
        if !self.ctx.is_surface_configured() {
            return Ok(());
        }
        let output = surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        self.encode(&mut encoder, &view, scene);
        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
