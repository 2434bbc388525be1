//! Named shader uniforms.
//!
//! Everything the scene pushes towards the GPU goes through [`ShaderInterface`]:
//! a write-only sink keyed by uniform name. [`UniformStore`] is the plain
//! in-memory implementation; the wgpu renderer embeds one and packs it into
//! uniform buffers whenever a mesh is drawn.

use std::collections::HashMap;

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const VIEW_POSITION: &str = "viewPosition";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "bUseTexture";
pub const USE_LIGHTING: &str = "bUseLighting";
pub const UV_SCALE: &str = "UVscale";
pub const MATERIAL_DIFFUSE: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

/// Slot value pushed to `objectTexture` when a tag has no registered texture.
pub const TEXTURE_SLOT_NONE: i32 = -1;

/// A single value held by a uniform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Bool(bool),
    Float(f32),
    Vec2(Vector2<f32>),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
    Mat4(Matrix4<f32>),
    Sampler2d(i32),
}

/// Write-only sink for named shader uniforms.
///
/// Implementations store or forward the value; nothing is ever read back
/// through this trait.
pub trait ShaderInterface {
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }

    fn set_sampler2d(&mut self, name: &str, slot: i32) {
        self.set_uniform(name, UniformValue::Sampler2d(slot));
    }
}

/// Last-write-wins storage of uniform values.
#[derive(Clone, Debug, Default)]
pub struct UniformStore {
    values: HashMap<String, UniformValue>,
    writes: usize,
}

impl UniformStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.values.get(name)
    }

    /// Total number of writes received, including overwrites.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Integer-like view of a uniform; bools and sampler slots convert too.
    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            UniformValue::Int(v) | UniformValue::Sampler2d(v) => Some(*v),
            UniformValue::Bool(b) => Some(*b as i32),
            _ => None,
        }
    }

    /// Boolean view of a uniform. Ints are truthy when non-zero, the way a
    /// GLSL `bool` uniform set through an int setter behaves.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            UniformValue::Bool(b) => Some(*b),
            UniformValue::Int(v) => Some(*v != 0),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn vec2(&self, name: &str) -> Option<Vector2<f32>> {
        match self.get(name)? {
            UniformValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn vec3(&self, name: &str) -> Option<Vector3<f32>> {
        match self.get(name)? {
            UniformValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn vec4(&self, name: &str) -> Option<Vector4<f32>> {
        match self.get(name)? {
            UniformValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    pub fn mat4(&self, name: &str) -> Option<Matrix4<f32>> {
        match self.get(name)? {
            UniformValue::Mat4(v) => Some(*v),
            _ => None,
        }
    }
}

impl ShaderInterface for UniformStore {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        log::trace!("uniform {name} = {value:?}");
        self.writes += 1;
        self.values.insert(name.to_string(), value);
    }
}
