use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use glowdrift::{Bounds, Container, SplitMix64, SurfaceConfig};

/// Render an ambient glowdrift surface to a sequence of PNG frames.
#[derive(Parser, Debug)]
#[command(name = "glowdrift", version)]
struct Cli {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Seconds of animation to render.
    #[arg(long, default_value_t = 10.0)]
    seconds: f64,

    /// Frames per second.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Output directory for `frame_%05d.png` files.
    #[arg(long)]
    out: PathBuf,

    /// Seed for deterministic output; omitted means entropy-backed randomness.
    #[arg(long)]
    seed: Option<u64>,

    /// Optional surface config as JSON (partial files fill in defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the blur pass regardless of the configured radius.
    #[arg(long)]
    no_blur: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    if !(cli.fps.is_finite() && cli.fps > 0.0) {
        anyhow::bail!("--fps must be > 0");
    }
    if !(cli.seconds.is_finite() && cli.seconds > 0.0) {
        anyhow::bail!("--seconds must be > 0");
    }

    let mut cfg = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{}'", path.display()))?;
            serde_json::from_str::<SurfaceConfig>(&text)
                .with_context(|| format!("invalid config '{}'", path.display()))?
        }
        None => SurfaceConfig::default(),
    };
    if cli.no_blur {
        cfg.blur_radius = 0;
    }

    let bounds = Bounds::new(cli.width, cli.height)?;
    let mut container = match cli.seed {
        Some(seed) => Container::with_random_source(cfg, bounds, Box::new(SplitMix64::new(seed)))?,
        None => Container::new(cfg, bounds)?,
    };

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("failed to create '{}'", cli.out.display()))?;

    let dt = 1.0 / cli.fps;
    let frame_count = (cli.seconds * cli.fps).ceil() as u64;
    tracing::info!(frames = frame_count, width = cli.width, height = cli.height, "rendering");

    for i in 0..frame_count {
        container.advance(dt)?;
        let frame = container.render()?;
        let rgba = frame.to_straight_rgba();
        let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
            .context("frame buffer did not match its dimensions")?;
        let path = cli.out.join(format!("frame_{i:05}.png"));
        img.save(&path)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
    }

    tracing::info!(out = %cli.out.display(), "done");
    Ok(())
}
