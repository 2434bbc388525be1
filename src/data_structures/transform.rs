//! Per-draw model transforms.
//!
//! A [`Transform`] is rebuilt for every draw step and never retained. The
//! composition order is fixed: scale, then rotate about X, Y and Z (in that
//! order), then translate:
//!
//! `model = T * Rz * Ry * Rx * S`
//!
//! Rotations do not commute, so changing this order changes the rendered
//! scene.

use cgmath::{Deg, Matrix4, Vector3};

use crate::uniforms::{self, ShaderInterface};

/// Scale, per-axis rotation in degrees and translation of one draw step.
///
/// No validation is applied: zero or negative scales are passed through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation_degrees: Vector3<f32>,
    pub translation: Vector3<f32>,
}

impl Transform {
    /// Identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation_degrees: Vector3::new(0.0, 0.0, 0.0),
            translation: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn from_parts(
        scale: impl Into<Vector3<f32>>,
        rotation_degrees: impl Into<Vector3<f32>>,
        translation: impl Into<Vector3<f32>>,
    ) -> Self {
        Self {
            scale: scale.into(),
            rotation_degrees: rotation_degrees.into(),
            translation: translation.into(),
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        let scale = Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z);
        let rotation_x = Matrix4::from_angle_x(Deg(self.rotation_degrees.x));
        let rotation_y = Matrix4::from_angle_y(Deg(self.rotation_degrees.y));
        let rotation_z = Matrix4::from_angle_z(Deg(self.rotation_degrees.z));
        let translation = Matrix4::from_translation(self.translation);

        translation * rotation_z * rotation_y * rotation_x * scale
    }

    /// Pushes the model matrix to the shader and returns it.
    pub fn apply(&self, shader: &mut impl ShaderInterface) -> Matrix4<f32> {
        let model = self.to_matrix();
        shader.set_mat4(uniforms::MODEL, model);
        model
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the model matrix for `scale`/`rotation_degrees`/`translation` and
/// pushes it to the `model` uniform.
pub fn compose(
    shader: &mut impl ShaderInterface,
    scale: impl Into<Vector3<f32>>,
    rotation_degrees: impl Into<Vector3<f32>>,
    translation: impl Into<Vector3<f32>>,
) -> Matrix4<f32> {
    Transform::from_parts(scale, rotation_degrees, translation).apply(shader)
}
