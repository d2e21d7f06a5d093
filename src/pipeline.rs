use std::path::PathBuf;

use crate::{
    discover, encode,
    error::{FlipbookError, FlipbookResult},
    geometry::{self, ResampleFilter, TargetGeometry},
    loader,
    palette::{self, DitherMode},
    sequence::{self, SequenceOptions},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub input_dir: PathBuf,
    pub out_path: PathBuf,
    pub recursive: bool,
    pub geometry: TargetGeometry,
    pub filter: ResampleFilter,
    pub preserve_transparency: bool,
    pub dither: DitherMode,
    pub fps: Option<f32>,
    pub duration_ms: Option<f64>,
    /// 0 = loop forever.
    pub loop_count: u16,
    pub reverse: bool,
    pub palette_optimize: bool,
}

impl Config {
    /// A config with the CLI's defaults: unconstrained geometry, Lanczos
    /// resampling, transparency preserved, Floyd-Steinberg dithering,
    /// 100 ms frames, infinite loop.
    pub fn new(input_dir: impl Into<PathBuf>, out_path: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            out_path: out_path.into(),
            recursive: false,
            geometry: TargetGeometry::Unconstrained,
            filter: ResampleFilter::HighQuality,
            preserve_transparency: true,
            dither: DitherMode::FloydSteinberg,
            fps: None,
            duration_ms: None,
            loop_count: 0,
            reverse: false,
            palette_optimize: false,
        }
    }

    pub fn validate(&self) -> FlipbookResult<()> {
        match self.geometry {
            TargetGeometry::Exact { width, height } | TargetGeometry::Fit { width, height } => {
                if width == 0 || height == 0 {
                    return Err(FlipbookError::geometry(format!(
                        "target size must be non-zero (got {width}x{height})"
                    )));
                }
            }
            TargetGeometry::Unconstrained => {}
        }

        sequence::frame_delay_ms(self.fps, self.duration_ms).map(|_| ())
    }
}

/// Run the whole pipeline: discover, load, size-normalize, palettize,
/// assemble, and write the animated GIF.
#[tracing::instrument(skip(cfg), fields(input = %cfg.input_dir.display()))]
pub fn run(cfg: &Config) -> FlipbookResult<()> {
    cfg.validate()?;

    let paths = discover::collect_frames(&cfg.input_dir, cfg.recursive)?;
    if paths.is_empty() {
        return Err(FlipbookError::empty_input(format!(
            "no png frames found in '{}'",
            cfg.input_dir.display()
        )));
    }
    tracing::debug!(frames = paths.len(), "discovered input frames");

    let mut frames = Vec::with_capacity(paths.len());
    for path in &paths {
        frames.push(loader::load_frame(path)?);
    }

    let frames = geometry::normalize(frames, cfg.geometry, cfg.filter);
    if let Some(first) = frames.first() {
        tracing::debug!(
            width = first.width(),
            height = first.height(),
            "normalized frame geometry"
        );
    }

    let mut indexed = Vec::with_capacity(frames.len());
    let mut any_transparent = false;
    for frame in &frames {
        let (indexed_frame, had) =
            palette::to_indexed(frame, cfg.preserve_transparency, cfg.dither);
        any_transparent |= had;
        indexed.push(indexed_frame);
    }

    if cfg.palette_optimize && !any_transparent {
        palette::compact_palettes(&mut indexed);
    }

    let delay_ms = sequence::frame_delay_ms(cfg.fps, cfg.duration_ms)?;
    let seq = sequence::assemble(
        indexed,
        any_transparent,
        SequenceOptions {
            delay_ms,
            loop_count: cfg.loop_count,
            reverse: cfg.reverse,
        },
    )?;
    tracing::debug!(
        frames = seq.frames.len(),
        delay_ms,
        transparent = seq.transparent_index.is_some(),
        "assembled sequence"
    );

    let bytes = encode::write_gif(&seq, &cfg.out_path)?;
    tracing::info!(bytes, out = %cfg.out_path.display(), "wrote animated gif");
    Ok(())
}
