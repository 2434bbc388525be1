#[cfg(feature = "integration-tests")]
use crate::common::test_utils::FakeCodec;
#[cfg(feature = "integration-tests")]
use party_scene::{
    camera::SceneCamera, config::RenderConfig, context::Context, renderer::GpuRenderer,
    scene::SceneAssembler,
};

#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
fn small_config(clear_colour: [f64; 4]) -> RenderConfig {
    RenderConfig {
        width: 96,
        height: 64,
        clear_colour,
        ..Default::default()
    }
}

#[cfg(feature = "integration-tests")]
#[tokio::test]
async fn should_render_clear_colour() {
    let config = small_config([1.0, 1.0, 1.0, 1.0]);
    let ctx = Context::new(&config).await.expect("no GPU adapter");
    let mut gfx = GpuRenderer::new(ctx);

    let frame = gfx.finish_frame().await.unwrap();

    assert_eq!(frame.dimensions(), (96, 64));
    for pixel in frame.pixels() {
        assert_eq!(*pixel, image::Rgba([255, 255, 255, 255]));
    }
}

#[cfg(feature = "integration-tests")]
#[tokio::test]
async fn should_render_party_scene() {
    let config = small_config([0.0, 0.0, 0.0, 1.0]);
    let ctx = Context::new(&config).await.expect("no GPU adapter");
    let mut gfx = GpuRenderer::new(ctx);

    let scene = SceneAssembler::party(&config.asset_dir);
    let mut prepared = scene
        .prepare(&mut gfx, &FakeCodec::accepting_everything())
        .unwrap();
    SceneCamera::from_config(&config).apply(&mut gfx);
    prepared.render(&mut gfx).unwrap();
    assert_eq!(gfx.pending_draws(), 17);

    let frame = gfx.finish_frame().await.unwrap();
    prepared.release(&mut gfx);

    assert_eq!(gfx.pending_draws(), 0);
    let lit = frame
        .pixels()
        .filter(|p| p.0[..3] != [0, 0, 0])
        .count();
    assert!(lit > 0, "the scene left the frame black");
}
