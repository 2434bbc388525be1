//! Fixed scene camera.
//!
//! The scene is a single still frame, so there is no controller: the camera is
//! built from [`CameraConfig`] and pushed once as the `view`, `projection` and
//! `viewPosition` uniforms.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};

use crate::{
    config::{CameraConfig, RenderConfig},
    uniforms::{self, ShaderInterface},
};

/// cgmath produces OpenGL clip space (z in -1..1); wgpu expects z in 0..1.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    yaw: Rad<f32>,
    pitch: Rad<f32>,
}

impl Camera {
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    pub fn direction(&self) -> Vector3<f32> {
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        Vector3::new(cos_pitch * cos_yaw, sin_pitch, cos_pitch * sin_yaw).normalize()
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.direction(), Vector3::unit_y())
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Camera and projection as one unit, ready to be pushed to a shader.
#[derive(Clone, Copy, Debug)]
pub struct SceneCamera {
    pub camera: Camera,
    pub projection: Projection,
}

impl SceneCamera {
    pub fn from_config(config: &RenderConfig) -> Self {
        let CameraConfig {
            position,
            yaw_deg,
            pitch_deg,
            fovy_deg,
            znear,
            zfar,
        } = config.camera;
        Self {
            camera: Camera::new(position, cgmath::Deg(yaw_deg), cgmath::Deg(pitch_deg)),
            projection: Projection::new(
                config.width,
                config.height,
                cgmath::Deg(fovy_deg),
                znear,
                zfar,
            ),
        }
    }

    pub fn apply(&self, shader: &mut impl ShaderInterface) {
        shader.set_mat4(uniforms::VIEW, self.camera.calc_matrix());
        shader.set_mat4(uniforms::PROJECTION, self.projection.calc_matrix());
        let p = self.camera.position;
        shader.set_vec3(uniforms::VIEW_POSITION, Vector3::new(p.x, p.y, p.z));
    }
}
