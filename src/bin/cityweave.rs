use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use cityweave::{RunConfig, StyleConfig};

#[derive(Parser, Debug)]
#[command(name = "cityweave", version, about = "Animate graph traversals over a US city map")]
struct Cli {
    /// Log debug detail (per-frame events).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every frame record into an MP4, a GIF or a directory of PNGs.
    Render(RenderArgs),
    /// Render a single frame record as a PNG.
    Frame(FrameArgs),
    /// Render the map alone (all cities in normal style) as a PNG.
    Map(MapArgs),
}

/// Inputs shared by every subcommand. Flags override the config file.
#[derive(Args, Debug)]
struct InputArgs {
    /// Run configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the states shapefile, cities CSV and edge list.
    #[arg(long)]
    data_root: Option<PathBuf>,

    /// Style JSON; replaces the config's `style` section.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Canvas width in pixels (with --height).
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Canvas height in pixels (with --width).
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Hide state labels.
    #[arg(long)]
    no_labels: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Directory of `*.txt` frame records.
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Output path: `.mp4`, `.gif`, or a directory for PNG frames.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Per-frame display time in milliseconds (GIF).
    #[arg(long)]
    interval_ms: Option<u32>,

    /// Frame rate of MP4 output.
    #[arg(long)]
    fps: Option<u32>,

    /// Parse each frame just before drawing it instead of validating all frames up front.
    /// A bad frame is then only found after the frames before it were drawn; the output is
    /// still removed.
    #[arg(long)]
    no_preload: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Frame record to draw.
    #[arg(long)]
    frame: PathBuf,

    /// Frame number shown in the caption.
    #[arg(long, default_value_t = 0)]
    index: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct MapArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Map(args) => cmd_map(args),
    }
}

fn load_config(input: &InputArgs) -> anyhow::Result<RunConfig> {
    let mut cfg = match &input.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };
    if let Some(root) = &input.data_root {
        cfg = cfg.with_data_root(root);
    }
    if let Some(path) = &input.style {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read style '{}'", path.display()))?;
        cfg.style = StyleConfig::from_json_str(&text)
            .with_context(|| format!("parse style '{}'", path.display()))?;
    }
    if let (Some(width), Some(height)) = (input.width, input.height) {
        cfg.canvas = Some(cityweave::Canvas::new(width, height)?);
    }
    if input.no_labels {
        cfg.style.show_labels = false;
    }
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.input)?;
    if let Some(dir) = args.frames {
        cfg.frames_dir = dir;
    }
    if let Some(ms) = args.interval_ms {
        cfg.interval_ms = ms;
    }
    if let Some(fps) = args.fps {
        cfg.export_fps = fps;
    }
    if args.no_preload {
        cfg.preload = false;
    }
    let out = args
        .out
        .or_else(|| cfg.out.clone())
        .context("no output path: pass --out or set `out` in the config")?;

    let stats = cityweave::run::render_animation(&cfg, &out)?;
    eprintln!(
        "wrote {} ({} frames, digest {})",
        out.display(),
        stats.frames,
        stats.digest
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input)?;
    cityweave::run::render_frame_png(&cfg, &args.frame, args.index, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_map(args: MapArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.input)?;
    cityweave::run::render_map_png(&cfg, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}
