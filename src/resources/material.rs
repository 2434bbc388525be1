//! Named material property sets.

use cgmath::Vector3;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("material tag '{0}' is already defined")]
    DuplicateTag(String),

    #[error("material '{tag}' has shininess {shininess}; it must be a positive number")]
    InvalidShininess { tag: String, shininess: f32 },
}

/// Phong reflectance properties of a surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub tag: String,
    pub diffuse_color: Vector3<f32>,
    pub specular_color: Vector3<f32>,
    pub shininess: f32,
}

/// Materials in definition order. Tags are unique; a repeated `define` is
/// rejected rather than shadowed.
#[derive(Clone, Debug, Default)]
pub struct MaterialRegistry {
    materials: Vec<Material>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(
        &mut self,
        tag: &str,
        diffuse_color: impl Into<Vector3<f32>>,
        specular_color: impl Into<Vector3<f32>>,
        shininess: f32,
    ) -> Result<(), MaterialError> {
        if self.materials.iter().any(|m| m.tag == tag) {
            return Err(MaterialError::DuplicateTag(tag.to_string()));
        }
        if !(shininess.is_finite() && shininess > 0.0) {
            return Err(MaterialError::InvalidShininess {
                tag: tag.to_string(),
                shininess,
            });
        }
        self.materials.push(Material {
            tag: tag.to_string(),
            diffuse_color: diffuse_color.into(),
            specular_color: specular_color.into(),
            shininess,
        });
        log::debug!("Defined material '{tag}'");
        Ok(())
    }

    pub fn lookup(&self, tag: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.tag == tag)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
