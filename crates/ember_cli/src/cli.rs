use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::scenes::SceneName;

/// Log verbosity accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Render one of the built-in scenes to an image file.
#[derive(Debug, Parser)]
#[command(name = "ember", version)]
#[command(about = "Offline Monte Carlo path tracer")]
pub struct Args {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = SceneName::FinalScene)]
    pub scene: SceneName,

    /// Image width in pixels; height follows the scene's aspect ratio
    #[arg(long)]
    pub width: Option<u32>,

    /// Samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(long)]
    pub max_depth: Option<u32>,

    /// Seed for scene generation and sampling; renders are reproducible when set
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file with render settings layered over the scene preset
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory holding image textures
    #[arg(long, default_value = "textures")]
    pub texture_dir: PathBuf,

    /// Output file (.ppm writes text PPM, other extensions go through the encoder)
    #[arg(long, short = 'o', default_value = "render.ppm")]
    pub output: PathBuf,

    /// Logging level; RUST_LOG applies when omitted
    #[arg(long)]
    pub log_level: Option<LogLevel>,
}
