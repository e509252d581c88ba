//! CPU-side geometry: vertex layout and generators for the shapes the scene uses.

use std::{collections::BTreeSet, f32::consts::PI};

use cgmath::{InnerSpace, Vector3};

/// Anything that can describe its own vertex buffer layout to a pipeline.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GeometryVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex for GeometryVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<GeometryVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Indexed triangle geometry.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<GeometryVertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// UV sphere centred on the origin.
    ///
    /// Rows run from the north pole (+y) to the south pole. The pole rows emit
    /// one triangle per quad, so the sphere has `w * (2h - 2)` triangles over
    /// `(w + 1) * (h + 1)` vertices.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let mut vertices = Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
        let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
        let mut index = 0;

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            // Shift pole uvs to the middle of their quad.
            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            let mut row = Vec::with_capacity(width_segments as usize + 1);
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (phi, theta) = (u * 2.0 * PI, v * PI);
                let position = Vector3::new(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                let normal = if position.magnitude2() > 0.0 {
                    position.normalize()
                } else {
                    Vector3::unit_y()
                };
                vertices.push(GeometryVertex {
                    position: position.into(),
                    normal: normal.into(),
                    uv: [u + u_offset, 1.0 - v],
                });
                row.push(index);
                index += 1;
            }
            grid.push(row);
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments as usize {
            for ix in 0..width_segments as usize {
                let a = grid[iy][ix + 1];
                let b = grid[iy][ix];
                let c = grid[iy + 1][ix];
                let d = grid[iy + 1][ix + 1];
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments as usize - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Single-segment plane in the xy plane facing +z.
    pub fn plane(width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let vertex = |x: f32, y: f32, u: f32, v: f32| GeometryVertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [u, v],
        };
        let vertices = vec![
            vertex(-hw, hh, 0.0, 1.0),
            vertex(hw, hh, 1.0, 1.0),
            vertex(-hw, -hh, 0.0, 0.0),
            vertex(hw, -hh, 1.0, 0.0),
        ];
        let indices = vec![0, 2, 1, 2, 3, 1];
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Unique undirected edges of all triangles as a line list.
    ///
    /// Edges shared by two triangles are emitted once, in ascending order.
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut edges = BTreeSet::new();
        for tri in self.indices.chunks_exact(3) {
            for (u, v) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                edges.insert(if u < v { (u, v) } else { (v, u) });
            }
        }
        edges.into_iter().flat_map(|(u, v)| [u, v]).collect()
    }
}
