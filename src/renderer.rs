//! wgpu implementation of the graphics backends.
//!
//! [`GpuRenderer`] turns the immediate-mode uniform stream into a single
//! offscreen render pass. Every `draw_mesh` snapshots the current uniforms
//! into an [`ObjectUniform`]; [`GpuRenderer::finish_frame`] uploads all
//! snapshots into one dynamic uniform buffer, replays the draws and reads the
//! colour target back.
//!
//! Camera and lights are frame-global: the values current when the frame is
//! finished apply to every draw of that frame.

use std::{collections::HashMap, iter, time::Duration};

use anyhow::Context as _;
use image::RgbaImage;
use instant::Instant;
use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::texture::{self, Texture},
    pipelines::{
        basic::{self, OBJECT_UNIFORM_STRIDE, ObjectUniform},
        light::{self, SceneUniform},
    },
    resources::{
        mesh::{MeshLibrary, Primitive},
        texture::{DecodedImage, MAX_TEXTURE_SLOTS, TextureBackend, TextureError},
    },
    uniforms::{ShaderInterface, UniformStore, UniformValue},
};

/// Opaque id of a texture uploaded to a [`GpuRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GpuTextureHandle(u32);

#[derive(Debug)]
struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

#[derive(Debug)]
struct BoundSlot {
    handle: GpuTextureHandle,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
struct DrawCall {
    primitive: Primitive,
    object: ObjectUniform,
}

#[derive(Debug)]
pub struct GpuRenderer {
    ctx: Context,
    uniforms: UniformStore,
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    fallback_sampler: wgpu::Sampler,
    fallback_bind_group: wgpu::BindGroup,
    textures: HashMap<GpuTextureHandle, Texture>,
    next_texture_id: u32,
    slots: Vec<Option<BoundSlot>>,
    meshes: HashMap<Primitive, GpuMesh>,
    draws: Vec<DrawCall>,
}

impl GpuRenderer {
    pub fn new(ctx: Context) -> Self {
        let device = &ctx.device;
        let scene_layout = light::mk_bind_group_layout(device);
        let object_layout = basic::object_bind_group_layout(device);
        let texture_layout = basic::texture_bind_group_layout(device);
        let pipeline =
            basic::mk_scene_pipeline(device, &scene_layout, &object_layout, &texture_layout);

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Buffer"),
            contents: bytemuck::cast_slice(&[SceneUniform::from_store(&UniformStore::new())]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let scene_bind_group = light::mk_bind_group(device, &scene_layout, &scene_buffer);

        let fallback = Texture::create_fallback(device, &ctx.queue);
        let fallback_sampler = texture::create_default_sampler(device);
        let fallback_bind_group = basic::texture_bind_group(
            device,
            &texture_layout,
            &fallback,
            &fallback_sampler,
            "fallback_texture_bind_group",
        );

        Self {
            ctx,
            uniforms: UniformStore::new(),
            pipeline,
            scene_buffer,
            scene_bind_group,
            object_layout,
            texture_layout,
            fallback_sampler,
            fallback_bind_group,
            textures: HashMap::new(),
            next_texture_id: 0,
            slots: (0..MAX_TEXTURE_SLOTS).map(|_| None).collect(),
            meshes: HashMap::new(),
            draws: Vec::new(),
        }
    }

    /// Draws queued since the last finished frame.
    pub fn pending_draws(&self) -> usize {
        self.draws.len()
    }

    fn slot_bind_group(&self, object: &ObjectUniform) -> &wgpu::BindGroup {
        if object.use_texture == 0 {
            return &self.fallback_bind_group;
        }
        usize::try_from(object.texture_slot)
            .ok()
            .and_then(|slot| self.slots.get(slot))
            .and_then(|slot| slot.as_ref())
            .map(|bound| &bound.bind_group)
            .unwrap_or(&self.fallback_bind_group)
    }

    /// Renders all pending draws into the offscreen target and returns the
    /// frame as RGBA8, top row first.
    pub async fn finish_frame(&mut self) -> anyhow::Result<RgbaImage> {
        let start = Instant::now();
        let device = &self.ctx.device;
        let (width, height) = (self.ctx.width, self.ctx.height);

        self.ctx.queue.write_buffer(
            &self.scene_buffer,
            0,
            bytemuck::cast_slice(&[SceneUniform::from_store(&self.uniforms)]),
        );

        let stride = OBJECT_UNIFORM_STRIDE as usize;
        let mut object_bytes = vec![0u8; stride * self.draws.len().max(1)];
        for (i, draw) in self.draws.iter().enumerate() {
            let raw = bytemuck::bytes_of(&draw.object);
            object_bytes[i * stride..i * stride + raw.len()].copy_from_slice(raw);
        }
        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Buffer"),
            contents: &object_bytes,
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &object_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(
                        std::mem::size_of::<ObjectUniform>() as wgpu::BufferAddress,
                    ),
                }),
            }],
            label: Some("object_bind_group"),
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.ctx.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            for (i, draw) in self.draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(&draw.primitive) else {
                    log::error!("{:?} mesh vanished before the frame was drawn", draw.primitive);
                    continue;
                };
                let offset = (i * stride) as wgpu::DynamicOffset;
                render_pass.set_bind_group(1, &object_bind_group, &[offset]);
                render_pass.set_bind_group(2, self.slot_bind_group(&draw.object), &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.num_indices, 0, 0..1);
            }
        }

        let u32_size = std::mem::size_of::<u32>() as u32;
        let unpadded_bytes_per_row = u32_size * width;
        let padded_bytes_per_row = unpadded_bytes_per_row
            .div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            size: (padded_bytes_per_row * height) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: Some("Readback Buffer"),
            mapped_at_creation: false,
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &self.ctx.color_target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        self.ctx.queue.submit(iter::once(encoder.finish()));
        let draw_count = self.draws.len();
        self.draws.clear();

        // The mapping has to be requested before polling, otherwise the
        // receive below never completes.
        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(10)),
            })
            .context("GPU did not finish the frame")?;
        rx.receive()
            .await
            .context("readback channel closed")?
            .context("failed to map readback buffer")?;

        let mut pixels = Vec::with_capacity((unpadded_bytes_per_row * height) as usize);
        {
            let data = buffer_slice.get_mapped_range();
            for row in data.chunks(padded_bytes_per_row as usize) {
                pixels.extend_from_slice(&row[..unpadded_bytes_per_row as usize]);
            }
        }
        output_buffer.unmap();

        let image = RgbaImage::from_raw(width, height, pixels)
            .context("readback size does not match the render target")?;
        log::info!("Frame with {draw_count} draws finished in {:?}", start.elapsed());
        Ok(image)
    }
}

impl ShaderInterface for GpuRenderer {
    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.uniforms.set_uniform(name, value);
    }
}

impl TextureBackend for GpuRenderer {
    type Handle = GpuTextureHandle;

    fn upload_texture(
        &mut self,
        tag: &str,
        image: &DecodedImage,
    ) -> Result<Self::Handle, TextureError> {
        let texture = Texture::from_decoded(&self.ctx.device, &self.ctx.queue, image, tag)?;
        let handle = GpuTextureHandle(self.next_texture_id);
        self.next_texture_id += 1;
        self.textures.insert(handle, texture);
        Ok(handle)
    }

    fn bind_texture(&mut self, slot: usize, handle: &Self::Handle) {
        if slot >= self.slots.len() {
            log::warn!("Texture slot {slot} is out of range; ignoring bind");
            return;
        }
        let Some(texture) = self.textures.get(handle) else {
            log::warn!("Cannot bind released texture {handle:?} to slot {slot}");
            return;
        };
        let bind_group = basic::texture_bind_group(
            &self.ctx.device,
            &self.texture_layout,
            texture,
            &self.fallback_sampler,
            &format!("texture_slot_{slot}"),
        );
        self.slots[slot] = Some(BoundSlot {
            handle: *handle,
            bind_group,
        });
    }

    fn release_texture(&mut self, handle: Self::Handle) {
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|bound| bound.handle == handle) {
                *slot = None;
            }
        }
        match self.textures.remove(&handle) {
            Some(texture) => texture.texture.destroy(),
            None => log::debug!("Texture {handle:?} already released"),
        }
    }
}

impl MeshLibrary for GpuRenderer {
    fn load_mesh(&mut self, primitive: Primitive) -> anyhow::Result<()> {
        if self.meshes.contains_key(&primitive) {
            log::debug!("{primitive:?} mesh already uploaded");
            return Ok(());
        }
        let data = primitive.generate();
        anyhow::ensure!(!data.indices.is_empty(), "{primitive:?} mesh has no triangles");
        let vertex_buffer = self
            .ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{primitive:?} Vertex Buffer")),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .ctx
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{primitive:?} Index Buffer")),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        log::debug!(
            "Uploaded {primitive:?} mesh: {} vertices, {} triangles",
            data.vertices.len(),
            data.triangle_count()
        );
        self.meshes.insert(
            primitive,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                num_indices: data.indices.len() as u32,
            },
        );
        Ok(())
    }

    fn draw_mesh(&mut self, primitive: Primitive) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.meshes.contains_key(&primitive),
            "{primitive:?} mesh drawn before it was loaded"
        );
        self.draws.push(DrawCall {
            primitive,
            object: ObjectUniform::from_store(&self.uniforms),
        });
        Ok(())
    }
}
