use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use flipbook::{Config, DitherMode, ResampleFilter, TargetGeometry};

/// Convert a folder of still PNG frames into an animated GIF.
#[derive(Parser, Debug)]
#[command(name = "flipbook", version)]
struct Cli {
    /// Folder containing the source PNG frames.
    input_dir: PathBuf,

    /// Output GIF path.
    #[arg(short, long, default_value = "output.gif")]
    output: PathBuf,

    /// Search subfolders for frames.
    #[arg(short, long)]
    recursive: bool,

    /// Frames per second; sets the per-frame delay to round(1000 / fps) ms.
    #[arg(long, conflicts_with = "duration")]
    fps: Option<f32>,

    /// Per-frame delay in milliseconds (default 100).
    #[arg(long)]
    duration: Option<f64>,

    /// Loop count (0 = loop forever).
    #[arg(long = "loop", default_value_t = 0)]
    loop_count: u16,

    /// Also play frames in reverse (ping-pong without duplicating endpoints).
    #[arg(long)]
    reverse: bool,

    /// Force all frames to this size, e.g. 800x600, ignoring aspect ratio.
    #[arg(long, value_parser = parse_size, conflicts_with = "fit")]
    resize: Option<(u32, u32)>,

    /// Letterbox/pad frames onto a canvas of this size, e.g. 800x600.
    #[arg(long, value_parser = parse_size)]
    fit: Option<(u32, u32)>,

    /// Flatten transparency onto a white background.
    #[arg(long)]
    no_alpha: bool,

    /// Resampling filter for resizing/fitting.
    #[arg(long, value_enum, default_value_t = ResampleChoice::Lanczos)]
    resample: ResampleChoice,

    /// Dithering for palette conversion.
    #[arg(long, value_enum, default_value_t = DitherChoice::FloydSteinberg)]
    dither: DitherChoice,

    /// Drop unused palette entries from fully opaque output.
    #[arg(long)]
    optimize: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ResampleChoice {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DitherChoice {
    None,
    FloydSteinberg,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let lower = s.to_ascii_lowercase();
    let (w, h) = lower
        .split_once('x')
        .ok_or_else(|| "size must look like 800x600".to_string())?;
    let w = w
        .trim()
        .parse::<u32>()
        .map_err(|_| "size must look like 800x600".to_string())?;
    let h = h
        .trim()
        .parse::<u32>()
        .map_err(|_| "size must look like 800x600".to_string())?;
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let geometry = match (cli.resize, cli.fit) {
        (Some((width, height)), _) => TargetGeometry::Exact { width, height },
        (None, Some((width, height))) => TargetGeometry::Fit { width, height },
        (None, None) => TargetGeometry::Unconstrained,
    };

    let cfg = Config {
        input_dir: cli.input_dir,
        out_path: cli.output,
        recursive: cli.recursive,
        geometry,
        filter: match cli.resample {
            ResampleChoice::Nearest => ResampleFilter::Nearest,
            ResampleChoice::Bilinear => ResampleFilter::Bilinear,
            ResampleChoice::Bicubic => ResampleFilter::Bicubic,
            ResampleChoice::Lanczos => ResampleFilter::HighQuality,
        },
        preserve_transparency: !cli.no_alpha,
        dither: match cli.dither {
            DitherChoice::None => DitherMode::None,
            DitherChoice::FloydSteinberg => DitherMode::FloydSteinberg,
        },
        fps: cli.fps,
        duration_ms: cli.duration,
        loop_count: cli.loop_count,
        reverse: cli.reverse,
        palette_optimize: cli.optimize,
    };

    flipbook::run(&cfg)?;

    eprintln!("wrote {}", cfg.out_path.display());
    Ok(())
}
