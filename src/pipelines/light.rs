use cgmath::{Matrix4, Vector3};

use crate::{data_structures::light::MAX_POINT_LIGHTS, uniforms::UniformStore};

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    pub direction: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub diffuse: [f32; 3],
    _padding2: u32,
    pub specular: [f32; 3],
    _padding3: u32,
}

/// The attenuation terms ride in the padding slot after each colour.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 3],
    pub active: u32,
    pub ambient: [f32; 3],
    pub constant: f32,
    pub diffuse: [f32; 3],
    pub linear: f32,
    pub specular: [f32; 3],
    pub quadratic: f32,
}

/// Frame-global values: camera and lights.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view_position: [f32; 3],
    _padding: u32,
    pub directional: DirectionalLightRaw,
    pub point_lights: [PointLightRaw; MAX_POINT_LIGHTS],
}

fn vec3(store: &UniformStore, name: &str) -> [f32; 3] {
    store.vec3(name).unwrap_or(Vector3::new(0.0, 0.0, 0.0)).into()
}

impl SceneUniform {
    /// Packs the camera and light uniforms currently held by `store`. Lights
    /// that were never written stay inactive.
    pub fn from_store(store: &UniformStore) -> Self {
        let view = store.mat4(crate::uniforms::VIEW).unwrap_or(Matrix4::from_scale(1.0));
        let projection = store
            .mat4(crate::uniforms::PROJECTION)
            .unwrap_or(Matrix4::from_scale(1.0));

        let directional = DirectionalLightRaw {
            direction: vec3(store, "directionalLight.direction"),
            active: store.flag("directionalLight.bActive").unwrap_or(false) as u32,
            ambient: vec3(store, "directionalLight.ambient"),
            diffuse: vec3(store, "directionalLight.diffuse"),
            specular: vec3(store, "directionalLight.specular"),
            ..Default::default()
        };

        let mut point_lights = [PointLightRaw::default(); MAX_POINT_LIGHTS];
        for (i, raw) in point_lights.iter_mut().enumerate() {
            let key = |field: &str| format!("pointLights[{i}].{field}");
            *raw = PointLightRaw {
                position: vec3(store, &key("position")),
                active: store.flag(&key("bActive")).unwrap_or(false) as u32,
                ambient: vec3(store, &key("ambient")),
                constant: store.float(&key("constant")).unwrap_or(1.0),
                diffuse: vec3(store, &key("diffuse")),
                linear: store.float(&key("linear")).unwrap_or(0.0),
                specular: vec3(store, &key("specular")),
                quadratic: store.float(&key("quadratic")).unwrap_or(0.0),
            };
        }

        Self {
            view_proj: (projection * view).into(),
            view_position: vec3(store, crate::uniforms::VIEW_POSITION),
            _padding: 0,
            directional,
            point_lights,
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("scene_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
        label: Some("scene_bind_group"),
    })
}
