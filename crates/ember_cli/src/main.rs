use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use ember_renderer::{render, Camera, RenderConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;

mod cli;
mod scenes;

use cli::{Args, LogLevel};

fn init_logger(level: Option<LogLevel>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level.into());
    }
    builder.init();
}

/// Layer the keys present in a JSON settings file over `base`.
fn load_config(path: &Path, base: &RenderConfig) -> Result<RenderConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("Config {} is not a JSON object", path.display()))?;

    let mut merged = serde_json::to_value(base)?;
    if let Some(fields) = merged.as_object_mut() {
        fields.extend(overrides);
    }

    serde_json::from_value(merged)
        .with_context(|| format!("Invalid render settings in {}", path.display()))
}

/// Resize to `width`, keeping the preset's aspect ratio.
fn with_width(camera: Camera, width: u32) -> Camera {
    let height = (u64::from(camera.image_height) * u64::from(width)
        / u64::from(camera.image_width))
    .max(1);
    let height = u32::try_from(height).unwrap_or(u32::MAX);
    camera.with_resolution(width, height)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level);

    let mut scene_rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let scene = args
        .scene
        .build(&mut scene_rng, &args.texture_dir)
        .with_context(|| format!("Failed to build scene {:?}", args.scene))?;

    let mut camera = scene.camera;
    let mut config = scene.settings;
    if let Some(path) = &args.config {
        config = load_config(path, &config)?;
        log::info!("Loaded render settings from {}", path.display());
    }

    if let Some(width) = args.width {
        camera = with_width(camera, width);
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    camera.initialize();
    log::info!(
        "Scene {:?}: {} objects, {}x{}",
        args.scene,
        scene.world.len(),
        camera.image_width,
        camera.image_height
    );

    let image = render(&camera, &scene.world, &config);
    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
