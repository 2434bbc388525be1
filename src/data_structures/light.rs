//! Static scene lighting.
//!
//! Lights are plain data written once during scene setup. The GPU shader
//! supports one directional light and up to [`MAX_POINT_LIGHTS`] point lights.

use cgmath::Vector3;

use crate::{render::RenderStateDispatcher, uniforms::ShaderInterface};

pub const MAX_POINT_LIGHTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    pub active: bool,
}

/// One light of either kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightDescriptor {
    Directional(DirectionalLight),
    Point(PointLight),
}

/// The fixed light topology of a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneLights {
    lights: Vec<LightDescriptor>,
}

impl SceneLights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, light: LightDescriptor) -> Self {
        self.lights.push(light);
        self
    }

    pub fn point_lights(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter().filter_map(|l| match l {
            LightDescriptor::Point(p) => Some(p),
            LightDescriptor::Directional(_) => None,
        })
    }

    /// Writes every light into the shader and enables lighting globally.
    ///
    /// Point lights are numbered in declaration order. Only one directional
    /// light exists in the shader; a later one overwrites an earlier one.
    /// Point lights past [`MAX_POINT_LIGHTS`] are dropped with a warning.
    pub fn configure(
        &self,
        shader: &mut impl ShaderInterface,
        dispatcher: &mut RenderStateDispatcher,
    ) {
        dispatcher.set_lighting(shader, true);

        let mut point_index = 0;
        for light in &self.lights {
            match light {
                LightDescriptor::Directional(dir) => {
                    shader.set_vec3("directionalLight.direction", dir.direction);
                    shader.set_vec3("directionalLight.ambient", dir.ambient);
                    shader.set_vec3("directionalLight.diffuse", dir.diffuse);
                    shader.set_vec3("directionalLight.specular", dir.specular);
                    shader.set_bool("directionalLight.bActive", dir.active);
                }
                LightDescriptor::Point(point) => {
                    if point_index >= MAX_POINT_LIGHTS {
                        log::warn!(
                            "Dropping point light at {:?}: only {} point lights are supported",
                            point.position,
                            MAX_POINT_LIGHTS
                        );
                        continue;
                    }
                    let key = |field: &str| format!("pointLights[{point_index}].{field}");
                    shader.set_vec3(&key("position"), point.position);
                    shader.set_vec3(&key("ambient"), point.ambient);
                    shader.set_vec3(&key("diffuse"), point.diffuse);
                    shader.set_vec3(&key("specular"), point.specular);
                    shader.set_float(&key("constant"), point.constant);
                    shader.set_float(&key("linear"), point.linear);
                    shader.set_float(&key("quadratic"), point.quadratic);
                    shader.set_bool(&key("bActive"), point.active);
                    point_index += 1;
                }
            }
        }
        log::info!(
            "Configured {} lights ({} point)",
            self.lights.len(),
            point_index
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::UniformStore;

    fn point(x: f32) -> LightDescriptor {
        LightDescriptor::Point(PointLight {
            position: Vector3::new(x, 0.0, 0.0),
            ambient: Vector3::new(0.1, 0.1, 0.1),
            diffuse: Vector3::new(1.0, 1.0, 1.0),
            specular: Vector3::new(1.0, 1.0, 1.0),
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            active: true,
        })
    }

    #[test]
    fn numbers_point_lights_and_drops_the_excess() {
        let lights = (0..=MAX_POINT_LIGHTS).fold(SceneLights::new(), |l, i| l.with(point(i as f32)));
        let mut shader = UniformStore::new();
        let mut dispatcher = RenderStateDispatcher::new();

        lights.configure(&mut shader, &mut dispatcher);

        assert!(dispatcher.state().use_lighting);
        assert_eq!(shader.vec3("pointLights[3].position"), Some(Vector3::new(3.0, 0.0, 0.0)));
        assert_eq!(shader.get("pointLights[4].position"), None);
        assert_eq!(lights.point_lights().count(), MAX_POINT_LIGHTS + 1);
    }
}
