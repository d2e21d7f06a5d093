use image::{
    DynamicImage, Rgba, RgbaImage,
    imageops::{self, FilterType},
};

/// Output size policy, selected once per run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetGeometry {
    /// Resample every frame to exactly this size, ignoring aspect ratio.
    Exact { width: u32, height: u32 },
    /// Letterbox every frame onto a transparent canvas of this size,
    /// preserving aspect ratio.
    Fit { width: u32, height: u32 },
    /// Leave sizes alone; pad to the common bounding box if they differ.
    Unconstrained,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResampleFilter {
    Nearest,
    Bilinear,
    Bicubic,
    HighQuality,
}

impl ResampleFilter {
    fn to_image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::Bicubic => FilterType::CatmullRom,
            Self::HighQuality => FilterType::Lanczos3,
        }
    }
}

/// Bring every frame to a uniform size according to `geometry`.
///
/// The returned frames all share identical dimensions, which the rest of the
/// pipeline relies on.
pub fn normalize(
    frames: Vec<DynamicImage>,
    geometry: TargetGeometry,
    filter: ResampleFilter,
) -> Vec<DynamicImage> {
    let filter = filter.to_image_filter();
    match geometry {
        TargetGeometry::Exact { width, height } => frames
            .into_iter()
            .map(|frame| frame.resize_exact(width, height, filter))
            .collect(),
        TargetGeometry::Fit { width, height } => frames
            .into_iter()
            .map(|frame| fit_to_canvas(&frame, width, height, filter))
            .collect(),
        TargetGeometry::Unconstrained => pad_to_common_size(frames),
    }
}

/// Scale factor math for the letterbox fit: the frame is scaled to the
/// largest size that fits entirely within the canvas without cropping.
fn fit_dimensions(
    frame_w: u32,
    frame_h: u32,
    canvas_w: u32,
    canvas_h: u32,
) -> (u32, u32) {
    let frame_aspect = frame_w as f64 / frame_h as f64;
    let canvas_aspect = canvas_w as f64 / canvas_h as f64;

    if frame_aspect > canvas_aspect {
        // Width-limited.
        let new_h = (canvas_w as f64 / frame_aspect).round() as u32;
        (canvas_w, new_h.max(1))
    } else {
        // Height-limited.
        let new_w = (canvas_h as f64 * frame_aspect).round() as u32;
        (new_w.max(1), canvas_h)
    }
}

fn fit_to_canvas(
    frame: &DynamicImage,
    canvas_w: u32,
    canvas_h: u32,
    filter: FilterType,
) -> DynamicImage {
    let (new_w, new_h) = fit_dimensions(frame.width(), frame.height(), canvas_w, canvas_h);
    let resized = frame.resize_exact(new_w, new_h, filter).to_rgba8();

    center_on_transparent_canvas(&resized, canvas_w, canvas_h)
}

/// Pad frames of differing sizes to the maximum width x maximum height,
/// centering each on a transparent canvas. Frames already at the common size
/// pass through untouched.
fn pad_to_common_size(frames: Vec<DynamicImage>) -> Vec<DynamicImage> {
    let max_w = frames.iter().map(|f| f.width()).max().unwrap_or(0);
    let max_h = frames.iter().map(|f| f.height()).max().unwrap_or(0);

    frames
        .into_iter()
        .map(|frame| {
            if frame.width() == max_w && frame.height() == max_h {
                frame
            } else {
                center_on_transparent_canvas(&frame.to_rgba8(), max_w, max_h)
            }
        })
        .collect()
}

fn center_on_transparent_canvas(frame: &RgbaImage, canvas_w: u32, canvas_h: u32) -> DynamicImage {
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, Rgba([0, 0, 0, 0]));
    let dx = (canvas_w - frame.width()) / 2;
    let dy = (canvas_h - frame.height()) / 2;
    imageops::overlay(&mut canvas, frame, i64::from(dx), i64::from(dy));
    DynamicImage::ImageRgba8(canvas)
}
