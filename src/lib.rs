#![forbid(unsafe_code)]

pub mod discover;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod palette;
pub mod pipeline;
pub mod sequence;

pub use error::{FlipbookError, FlipbookResult};
pub use geometry::{ResampleFilter, TargetGeometry};
pub use palette::{ALPHA_THRESHOLD, DitherMode, IndexedFrame, TRANSPARENT_INDEX};
pub use pipeline::{Config, run};
pub use sequence::{DEFAULT_FRAME_DELAY_MS, FrameSequence};
