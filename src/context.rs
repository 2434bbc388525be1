use anyhow::Context as _;

use crate::{config::RenderConfig, data_structures::texture};

/// Headless GPU context: device, queue and an offscreen colour target of the
/// configured size.
#[derive(Debug)]
pub struct Context {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub(crate) color_target: wgpu::Texture,
    pub(crate) color_view: wgpu::TextureView,
    pub(crate) depth_texture: texture::Texture,
    pub width: u32,
    pub height: u32,
    pub clear_colour: wgpu::Color,
}

impl Context {
    /// Offscreen colour format. sRGB, so readback matches what a window would
    /// show.
    pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub async fn new(config: &RenderConfig) -> anyhow::Result<Self> {
        let width = config.width.max(1);
        let height = config.height.max(1);

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("party-scene device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        texture::check_dimensions(width, height, device.limits().max_texture_dimension_2d)
            .map_err(|reason| anyhow::anyhow!("invalid render target size: {reason}"))?;

        let color_target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen colour target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::TARGET_FORMAT,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let color_view = color_target.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_texture =
            texture::Texture::create_depth_texture(&device, [width, height], "depth_texture");

        Ok(Self {
            device,
            queue,
            color_target,
            color_view,
            depth_texture,
            width,
            height,
            clear_colour: config.clear_colour(),
        })
    }
}
