//! Render pipeline and GPU uniform layouts.
//!
//! - `basic`: the Phong scene pipeline and the per-draw [`basic::ObjectUniform`]
//! - `light`: the frame-global [`light::SceneUniform`] (camera and lights)
pub mod basic;
pub mod light;
