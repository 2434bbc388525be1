//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU texture resources,
//! and helpers for creating depth targets, the white fallback texture and
//! mip-mapped colour textures from decoded images.

use image::{RgbaImage, imageops::FilterType};

use crate::resources::texture::{DecodedImage, TextureError};

/// A GPU texture with a view and optional sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    /// Colour textures are authored in sRGB.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// 1x1 opaque white texture. Bound wherever a draw references a slot with
    /// no texture, so untextured draws sample a neutral colour.
    pub fn create_fallback(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let rgba = RgbaImage::from_pixel(1, 1, image::Rgba([u8::MAX; 4]));
        Self::upload_mip_chain(device, queue, &rgba, "fallback texture")
    }

    /// Upload a decoded RGB/RGBA image together with its full mip chain.
    pub fn from_decoded(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        label: &str,
    ) -> Result<Self, TextureError> {
        let rgba = image.to_rgba8(label)?;
        let rgba = RgbaImage::from_raw(image.width, image.height, rgba).ok_or_else(|| {
            TextureError::Upload {
                tag: label.to_string(),
                reason: format!(
                    "pixel buffer does not match {}x{}",
                    image.width, image.height
                ),
            }
        })?;
        check_dimensions(
            rgba.width(),
            rgba.height(),
            device.limits().max_texture_dimension_2d,
        )
        .map_err(|reason| TextureError::Upload {
            tag: label.to_string(),
            reason,
        })?;
        Ok(Self::upload_mip_chain(device, queue, &rgba, label))
    }

    fn upload_mip_chain(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &RgbaImage,
        label: &str,
    ) -> Self {
        let (width, height) = rgba.dimensions();
        let mip_level_count = mip_level_count(width, height);
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        // wgpu has no glGenerateMipmap; the levels are downsampled on the CPU.
        for level in 0..mip_level_count {
            let level_width = (width >> level).max(1);
            let level_height = (height >> level).max(1);
            let level_image = if level == 0 {
                rgba.clone()
            } else {
                image::imageops::resize(rgba, level_width, level_height, FilterType::Triangle)
            };
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: level,
                    origin: wgpu::Origin3d::ZERO,
                },
                &level_image,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * level_width),
                    rows_per_image: Some(level_height),
                },
                wgpu::Extent3d {
                    width: level_width,
                    height: level_height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(create_default_sampler(device));

        Self {
            texture,
            view,
            sampler,
        }
    }
}

/// Checks that a `width` x `height` texture is non-empty and fits within
/// `max_dimension` on both sides.
pub fn check_dimensions(width: u32, height: u32, max_dimension: u32) -> Result<(), String> {
    if width == 0 || height == 0 {
        return Err("image is empty".to_string());
    }
    if width > max_dimension || height > max_dimension {
        return Err(format!(
            "{width}x{height} exceeds max texture dimension {max_dimension}"
        ));
    }
    Ok(())
}

/// Number of mip levels down to 1x1 for a `width` x `height` image.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Repeat wrapping with linear filtering across and between mip levels.
pub fn create_default_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::MipmapFilterMode::Linear,
        ..Default::default()
    })
}
