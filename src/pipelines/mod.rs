//! Render pipelines and the uniforms they bind.
//!
//! - `basic` builds the Phong pipelines (filled and wireframe) and the shared pipeline factory
//! - `background` draws the screen-space gradient backdrop
//! - `light` packs the scene's light rig into a uniform buffer

pub mod background;
pub mod basic;
pub mod light;
