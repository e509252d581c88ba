//! Scene data structures: geometry, materials, transforms, scene graph and render targets.
//!
//! - `geometry` contains the vertex layout and sphere/plane generators
//! - `material` holds Phong and gradient shading parameters and their uniforms
//! - `transform` holds per-node transformation data and its GPU layout
//! - `scene_graph` enables hierarchical scene organization
//! - `texture` wraps depth and offscreen render targets

pub mod geometry;
pub mod material;
pub mod scene_graph;
pub mod texture;
pub mod transform;
