use std::env;
use std::time::Instant;

use anyhow::Context;
use log::{debug, info};

use lumen::config::RenderConfig;
use lumen::Renderer;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => RenderConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => {
            info!("no config given, rendering the demo scene with defaults");
            RenderConfig::default()
        }
    };

    let scene = config.scene();
    let camera = config.camera.build(config.width, config.height);

    let mut renderer = Renderer::new();
    renderer.resize(config.width, config.height);

    info!(
        "rendering {} spheres at {}x{} for {} frames",
        scene.spheres.len(),
        config.width,
        config.height,
        config.frames
    );

    let start = Instant::now();
    for frame in 1..=config.frames {
        let frame_start = Instant::now();
        renderer.render(&scene, &camera, &config.settings);
        debug!("frame {frame} took {:.3}ms", frame_start.elapsed().as_secs_f64() * 1000.0);
    }
    info!(
        "{} frames in {:.2}s",
        config.frames,
        start.elapsed().as_secs_f64()
    );

    renderer
        .final_image()
        .save_png(&config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;
    info!("wrote {}", config.output.display());

    Ok(())
}
