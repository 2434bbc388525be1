//! Renders the party scene to a PNG.
//!
//! Usage: `party-scene [config.toml]`

use anyhow::Context as _;
use party_scene::{
    camera::SceneCamera,
    config::RenderConfig,
    context::Context,
    logging::{LoggingConfig, init_logging},
    renderer::GpuRenderer,
    resources::texture::ImageCrateCodec,
    scene::SceneAssembler,
};

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => RenderConfig::load(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => RenderConfig::default(),
    };

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..Default::default()
    });

    futures::executor::block_on(run(config))
}

async fn run(config: RenderConfig) -> anyhow::Result<()> {
    let ctx = Context::new(&config).await?;
    let mut gfx = GpuRenderer::new(ctx);

    let scene = SceneAssembler::party(&config.asset_dir);
    let mut prepared = scene.prepare(&mut gfx, &ImageCrateCodec)?;
    SceneCamera::from_config(&config).apply(&mut gfx);

    prepared.render(&mut gfx)?;
    let frame = gfx.finish_frame().await?;
    prepared.release(&mut gfx);

    frame
        .save(&config.output)
        .with_context(|| format!("failed to write {}", config.output.display()))?;
    log::info!("Wrote {}", config.output.display());
    Ok(())
}
