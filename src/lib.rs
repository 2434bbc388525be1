//! party-scene
//!
//! A static 3D scene renderer. A scene is described once (textures under
//! tags, named materials, a fixed light set and an ordered list of draw steps)
//! and rendered headless with wgpu into an image. Render state is cumulative:
//! each draw step inherits whatever texture, colour, UV scale and material the
//! previous steps left behind.
//!
//! High-level modules
//! - `uniforms`: named uniform sink shared by the scene and the GPU backend
//! - `render`: cumulative per-draw render state and its dispatcher
//! - `resources`: texture slots, the material registry and primitive meshes
//! - `data_structures`: transforms, lights and GPU textures
//! - `scene`: scene description, setup and the draw loop
//! - `renderer`: the wgpu backend and offscreen readback
//! - `camera`, `config`, `context`, `logging`, `pipelines`: the ambient stack
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod logging;
pub mod pipelines;
pub mod render;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod uniforms;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use wgpu;
