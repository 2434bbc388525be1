//! Scene data structures: textures, lights and transforms.
//!
//! - `texture` is the GPU texture wrapper and its creation utilities
//! - `light` holds the static directional/point light set
//! - `transform` builds the per-draw model matrix

pub mod light;
pub mod texture;
pub mod transform;
