use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_core::{load_scene, presets, SceneDescription};
use lumen_tracer::{write_png, IntegratorConfig, ProgressiveRenderer, RenderConfig};

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
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

#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "Progressive Monte Carlo path tracer for sphere scenes")]
struct Args {
    /// JSON scene file (overrides --preset)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Built-in scene to render
    #[arg(long, default_value = "cornell")]
    preset: String,

    /// Image width in pixels
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 192)]
    height: u32,

    /// Samples per pixel per frame
    #[arg(long, short = 's', default_value_t = 1)]
    spp: u32,

    /// Number of frames to accumulate
    #[arg(long, short = 'f', default_value_t = 64)]
    frames: u32,

    /// Write the running image every N frames (0 writes only at the end)
    #[arg(long, default_value_t = 0)]
    save_every: u32,

    /// Hard cap on path length; disables unbiased termination
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_depth: Option<u32>,

    /// Output PNG path
    #[arg(short, long, default_value = "lumen.png")]
    output: PathBuf,

    /// Logging level (RUST_LOG still applies to other modules)
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

fn load(args: &Args) -> Result<SceneDescription> {
    match &args.scene {
        Some(path) => load_scene(path).with_context(|| format!("Failed to load scene {:?}", path)),
        None => presets::by_name(&args.preset).with_context(|| {
            format!("Available presets: {}", presets::PRESET_NAMES.join(", "))
        }),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    if args.width == 0 || args.height == 0 {
        bail!("Image size must be non-zero, got {}x{}", args.width, args.height);
    }

    let description = load(&args)?;
    let config = RenderConfig {
        width: args.width,
        height: args.height,
        samples_per_pixel: args.spp,
        integrator: IntegratorConfig {
            max_depth: args.max_depth,
            ..Default::default()
        },
    };

    let mut renderer = ProgressiveRenderer::new(description.scene, &description.camera, config);
    let start = Instant::now();

    for _ in 0..args.frames {
        let frames = renderer
            .render_next_frame()
            .context("Failed to merge frame")?;
        if args.save_every > 0 && frames % args.save_every == 0 {
            write_png(renderer.accumulator(), &args.output)
                .with_context(|| format!("Failed to write {:?}", args.output))?;
        }
    }

    log::info!(
        "Rendered {} frames ({} spp) in {:.2?}",
        renderer.accumulator().frame_count(),
        renderer.accumulator().sample_count(),
        start.elapsed()
    );

    write_png(renderer.accumulator(), &args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    Ok(())
}
