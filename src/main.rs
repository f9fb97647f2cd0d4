use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use clip_carousel::constants::*;
use clip_carousel::engine::{Effect, MediaCommand};
use clip_carousel::{CarouselConfig, ClipRegistry, Simulation};

#[cfg(feature = "viewer")]
mod viewer;

#[derive(Parser, Debug)]
#[command(name = "clip-carousel", about = "Video clip carousel with synchronized progress indicators")]
struct Args {
    /// JSON file with the clip list (defaults to the built-in highlights)
    #[arg(long)]
    clips: Option<PathBuf>,

    /// JSON file with engine settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Clips that must load before playback starts
    #[arg(long)]
    min_ready: Option<usize>,

    #[arg(long, default_value_t = RENDER_WIDTH)]
    width: i32,

    #[arg(long, default_value_t = RENDER_HEIGHT)]
    height: i32,

    #[arg(long, default_value_t = FPS)]
    fps: u32,

    /// Run the carousel once without a window and exit
    #[arg(long)]
    headless: bool,

    /// Seed for the simulated load latency
    #[arg(long)]
    seed: Option<u64>,

    /// Upper bound of the simulated load latency, in seconds
    #[arg(long, default_value_t = 0.8)]
    max_load_delay: f64,

    /// Clip index whose metadata never arrives (repeatable)
    #[arg(long = "never-load")]
    never_load: Vec<usize>,
}

fn load_config(args: &Args) -> Result<CarouselConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
            CarouselConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => CarouselConfig::default(),
    };
    if let Some(min_ready) = args.min_ready {
        config.min_ready_clips = min_ready;
    }
    config.validate()?;
    Ok(config)
}

fn load_registry(args: &Args) -> Result<ClipRegistry> {
    match &args.clips {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading clips {}", path.display()))?;
            Ok(ClipRegistry::from_json(&json).with_context(|| format!("parsing clips {}", path.display()))?)
        }
        None => Ok(ClipRegistry::highlights()),
    }
}

fn log_effect(effect: &Effect) {
    match effect {
        Effect::Slide(request) => info!(offset = request.offset_percent, "Slide"),
        Effect::Indicator(request) => debug!(
            slot = request.slot,
            percent = request.progress_percent,
            width = ?request.width,
            fill = ?request.fill,
            "Indicator"
        ),
        Effect::Media { clip, command: MediaCommand::Rewind } => info!(%clip, "Rewind"),
        Effect::Media { clip, command } => debug!(%clip, ?command, "Media"),
    }
}

fn run_headless(mut sim: Simulation, fps: u32) -> Result<()> {
    let dt = 1.0 / fps as f64;

    // Without a window every slide counts as in view as soon as it is requested.
    let finished = sim.run_until_finished(dt, HEADLESS_FRAME_LIMIT, |engine, effects| {
        effects.iter().for_each(log_effect);
        let active = engine.active_clip();
        engine.on_visible(active)
    })?;

    if !finished {
        let state = sim.engine().state();
        bail!(
            "carousel stalled on clip {} after {} frames ({} of {} clips ready)",
            state.active_index(),
            sim.frames(),
            state.ready_count(),
            state.clip_count()
        );
    }

    info!(frames = sim.frames(), elapsed = sim.elapsed(), "Carousel finished");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clip_carousel=info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let registry = load_registry(&args)?;

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut rng = StdRng::seed_from_u64(seed);
    info!(clips = registry.len(), seed, min_ready = config.min_ready_clips, "Starting carousel");

    let sim = Simulation::with_latency(
        registry,
        &config,
        args.width as f32,
        &mut rng,
        args.max_load_delay,
        &args.never_load,
    )?;

    if args.headless {
        return run_headless(sim, args.fps);
    }

    #[cfg(feature = "viewer")]
    {
        viewer::run(sim, &config, args.width, args.height, args.fps)
    }

    #[cfg(not(feature = "viewer"))]
    {
        drop(sim);
        bail!("built without the `viewer` feature; pass --headless")
    }
}
