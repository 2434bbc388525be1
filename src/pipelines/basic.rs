use cgmath::{Matrix, Matrix4, SquareMatrix, Vector2, Vector3, Vector4};

use crate::{
    context::Context,
    data_structures::texture::Texture,
    resources::mesh::MeshVertex,
    uniforms::{self, TEXTURE_SLOT_NONE, UniformStore},
};

/// Distance between two [`ObjectUniform`]s in the per-draw buffer. Matches
/// the default `min_uniform_buffer_offset_alignment`.
pub const OBJECT_UNIFORM_STRIDE: wgpu::BufferAddress = 256;

/// Everything a single draw reads: model matrices and the render state that
/// was current when the draw was issued.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub object_color: [f32; 4],
    pub uv_scale: [f32; 2],
    pub use_texture: u32,
    pub use_lighting: u32,
    pub diffuse_color: [f32; 3],
    pub shininess: f32,
    pub specular_color: [f32; 3],
    pub texture_slot: i32,
}

impl ObjectUniform {
    /// Snapshots the per-draw uniforms held by `store`.
    ///
    /// Values never written fall back to white, unit UV scale and a plain
    /// white diffuse material.
    pub fn from_store(store: &UniformStore) -> Self {
        let model = store
            .mat4(uniforms::MODEL)
            .unwrap_or(Matrix4::identity());
        // Scale is non-uniform, so normals need the inverse transpose.
        let normal = model
            .invert()
            .map(|m| m.transpose())
            .unwrap_or(Matrix4::identity());
        let color = store
            .vec4(uniforms::OBJECT_COLOR)
            .unwrap_or(Vector4::new(1.0, 1.0, 1.0, 1.0));
        let uv_scale = store
            .vec2(uniforms::UV_SCALE)
            .unwrap_or(Vector2::new(1.0, 1.0));
        let diffuse = store
            .vec3(uniforms::MATERIAL_DIFFUSE)
            .unwrap_or(Vector3::new(1.0, 1.0, 1.0));
        let specular = store
            .vec3(uniforms::MATERIAL_SPECULAR)
            .unwrap_or(Vector3::new(0.0, 0.0, 0.0));

        Self {
            model: model.into(),
            normal: normal.into(),
            object_color: color.into(),
            uv_scale: uv_scale.into(),
            use_texture: store.flag(uniforms::USE_TEXTURE).unwrap_or(false) as u32,
            use_lighting: store.flag(uniforms::USE_LIGHTING).unwrap_or(false) as u32,
            diffuse_color: diffuse.into(),
            shininess: store.float(uniforms::MATERIAL_SHININESS).unwrap_or(1.0),
            specular_color: specular.into(),
            texture_slot: store
                .int(uniforms::OBJECT_TEXTURE)
                .unwrap_or(TEXTURE_SLOT_NONE),
        }
    }
}

pub fn object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: wgpu::BufferSize::new(
                    std::mem::size_of::<ObjectUniform>() as wgpu::BufferAddress,
                ),
            },
            count: None,
        }],
        label: Some("object_bind_group_layout"),
    })
}

pub fn texture_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("texture_bind_group_layout"),
    })
}

pub fn texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    fallback_sampler: &wgpu::Sampler,
    label: &str,
) -> wgpu::BindGroup {
    let sampler = texture.sampler.as_ref().unwrap_or(fallback_sampler);
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
        label: Some(label),
    })
}

/// Phong pipeline drawing [`MeshVertex`] triangle lists into the offscreen
/// target.
pub fn mk_scene_pipeline(
    device: &wgpu::Device,
    scene_bind_group_layout: &wgpu::BindGroupLayout,
    object_bind_group_layout: &wgpu::BindGroupLayout,
    texture_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[
            scene_bind_group_layout,
            object_bind_group_layout,
            texture_bind_group_layout,
        ],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        Context::TARGET_FORMAT,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(Texture::DEPTH_FORMAT),
        &[MeshVertex::desc()],
        shader,
    )
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Thin shapes (napkin, icing) are seen from both sides.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uniforms::ShaderInterface;

    #[test]
    fn object_uniform_fits_in_one_stride() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 192);
        assert!(std::mem::size_of::<ObjectUniform>() as u64 <= OBJECT_UNIFORM_STRIDE);
    }

    #[test]
    fn snapshot_uses_defaults_for_unset_values() {
        let object = ObjectUniform::from_store(&UniformStore::new());
        assert_eq!(object.object_color, [1.0; 4]);
        assert_eq!(object.uv_scale, [1.0, 1.0]);
        assert_eq!(object.use_texture, 0);
        assert_eq!(object.texture_slot, TEXTURE_SLOT_NONE);
    }

    #[test]
    fn snapshot_carries_texture_selection() {
        let mut store = UniformStore::new();
        store.set_bool(uniforms::USE_TEXTURE, true);
        store.set_sampler2d(uniforms::OBJECT_TEXTURE, 3);
        store.set_vec2(uniforms::UV_SCALE, Vector2::new(2.5, 2.5));

        let object = ObjectUniform::from_store(&store);
        assert_eq!(object.use_texture, 1);
        assert_eq!(object.texture_slot, 3);
        assert_eq!(object.uv_scale, [2.5, 2.5]);
    }
}
