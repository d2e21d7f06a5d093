use std::path::Path;

use image::DynamicImage;

use crate::error::{FlipbookError, FlipbookResult};

/// Decode one source file into an in-memory raster.
///
/// Undecodable files are reported as [`FlipbookError::Decode`]; frames with a
/// zero dimension are rejected here so the rest of the pipeline can assume
/// non-degenerate geometry.
pub fn load_frame(path: &Path) -> FlipbookResult<DynamicImage> {
    let reader = image::ImageReader::open(path).map_err(|e| {
        FlipbookError::decode(format!("cannot open '{}': {e}", path.display()))
    })?;
    let img = reader.decode().map_err(|e| {
        FlipbookError::decode(format!("cannot decode '{}': {e}", path.display()))
    })?;

    if img.width() == 0 || img.height() == 0 {
        return Err(FlipbookError::geometry(format!(
            "frame '{}' has a zero dimension ({}x{})",
            path.display(),
            img.width(),
            img.height()
        )));
    }

    Ok(img)
}
