//! Per-draw render state.
//!
//! The shader keeps whatever uniform values it was last given. Each draw step
//! only overwrites the values it sets, so a step inherits everything else
//! (texture, colour, UV scale, material) from the steps before it.
//! [`RenderState`] mirrors that cumulative state on the CPU, and
//! [`RenderStateDispatcher`] is the only thing allowed to change it.
//!
//! # Key types
//!
//! - [`RenderState`] is the current shader-side state, inspectable at any time
//! - [`RenderStateDispatcher`] holds the state and forwards each change to a
//!   [`ShaderInterface`]
//!

use cgmath::{Vector2, Vector3, Vector4};

use crate::{
    resources::{material::MaterialRegistry, texture::TextureRegistry},
    uniforms::{self, ShaderInterface, TEXTURE_SLOT_NONE},
};

/// The material values last pushed to the shader.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialState {
    pub tag: String,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

/// Texture selection last pushed to the shader. `slot` is
/// [`TEXTURE_SLOT_NONE`] when the tag was not registered.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureState {
    pub tag: String,
    pub slot: i32,
}

/// Cumulative render state. `None` means the value was never set since
/// `prepare()`. The state is not reset between `render()` calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderState {
    pub texture: Option<TextureState>,
    pub color: Option<Vector4<f32>>,
    pub uv_scale: Option<Vector2<f32>>,
    pub material: Option<MaterialState>,
    pub use_texture: bool,
    pub use_lighting: bool,
}

#[derive(Debug, Default)]
pub struct RenderStateDispatcher {
    state: RenderState,
}

impl RenderStateDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Flat RGBA colour; turns texturing off.
    pub fn set_color(&mut self, shader: &mut impl ShaderInterface, r: f32, g: f32, b: f32, a: f32) {
        let color = Vector4::new(r, g, b, a);
        shader.set_bool(uniforms::USE_TEXTURE, false);
        shader.set_vec4(uniforms::OBJECT_COLOR, color);
        self.state.use_texture = false;
        self.state.color = Some(color);
    }

    /// Turns texturing on and selects the slot registered under `tag`.
    ///
    /// An unknown tag pushes [`TEXTURE_SLOT_NONE`]; the draw still happens and
    /// samples the renderer's fallback texture.
    pub fn set_texture<H: Clone + std::fmt::Debug>(
        &mut self,
        shader: &mut impl ShaderInterface,
        textures: &TextureRegistry<H>,
        tag: &str,
    ) {
        let slot = match textures.lookup_slot(tag) {
            Some(slot) => slot as i32,
            None => {
                log::debug!("Texture '{tag}' has no slot; pushing {TEXTURE_SLOT_NONE}");
                TEXTURE_SLOT_NONE
            }
        };
        shader.set_bool(uniforms::USE_TEXTURE, true);
        shader.set_sampler2d(uniforms::OBJECT_TEXTURE, slot);
        self.state.use_texture = true;
        self.state.texture = Some(TextureState {
            tag: tag.to_string(),
            slot,
        });
    }

    pub fn set_uv_scale(&mut self, shader: &mut impl ShaderInterface, u: f32, v: f32) {
        let scale = Vector2::new(u, v);
        shader.set_vec2(uniforms::UV_SCALE, scale);
        self.state.uv_scale = Some(scale);
    }

    /// Pushes the material registered under `tag`. Leaves the previous
    /// material in place when the registry is empty or the tag is unknown.
    pub fn set_material(
        &mut self,
        shader: &mut impl ShaderInterface,
        materials: &MaterialRegistry,
        tag: &str,
    ) {
        if materials.is_empty() {
            log::warn!("Material '{tag}' requested but no materials are defined");
            return;
        }
        let Some(material) = materials.lookup(tag) else {
            log::warn!("Material '{tag}' is not defined; keeping the previous material");
            return;
        };
        log::debug!("Material '{tag}' found");
        shader.set_vec3(uniforms::MATERIAL_DIFFUSE, material.diffuse_color);
        shader.set_vec3(uniforms::MATERIAL_SPECULAR, material.specular_color);
        shader.set_float(uniforms::MATERIAL_SHININESS, material.shininess);
        self.state.material = Some(MaterialState {
            tag: material.tag.clone(),
            diffuse_color: material.diffuse_color,
            specular_color: material.specular_color,
            shininess: material.shininess,
        });
    }

    pub fn set_lighting(&mut self, shader: &mut impl ShaderInterface, enabled: bool) {
        shader.set_bool(uniforms::USE_LIGHTING, enabled);
        self.state.use_lighting = enabled;
    }
}
