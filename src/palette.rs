use color_quant::NeuQuant;
use image::{DynamicImage, RgbaImage, imageops};

/// Reserved palette index for fully transparent pixels. Global across a
/// sequence, since the encoder applies one transparency index per image.
pub const TRANSPARENT_INDEX: u8 = 255;

/// Pixels with alpha at or below this value are classified transparent.
/// Indexed-color output supports only binary transparency, so this hard
/// cutoff is the correctness-preserving approximation of graded alpha.
pub const ALPHA_THRESHOLD: u8 = 128;

const NEUQUANT_SAMPLE_FACTOR: i32 = 10;
const BACKGROUND_RGB: [u8; 3] = [255, 255, 255];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DitherMode {
    None,
    FloydSteinberg,
}

/// One frame in indexed-color form: per-pixel palette indices plus a flat
/// RGB palette of at most 256 entries (255 when [`TRANSPARENT_INDEX`] is
/// reserved).
#[derive(Clone, Debug)]
pub struct IndexedFrame {
    pub width: u32,
    pub height: u32,
    pub indices: Vec<u8>,
    pub palette: Vec<u8>,
}

/// Convert a size-normalized frame to indexed color.
///
/// Returns the frame plus whether any pixel was actually masked transparent,
/// which the assembler aggregates to decide if transparency metadata is
/// emitted at all.
pub fn to_indexed(
    frame: &DynamicImage,
    preserve_transparency: bool,
    dither: DitherMode,
) -> (IndexedFrame, bool) {
    if !preserve_transparency {
        let flattened = flatten_over_background(frame);
        return (quantize_opaque(flattened, 256, dither), false);
    }

    if !frame.color().has_alpha() {
        // Nothing to preserve; palettize normally with the full budget.
        return (quantize_opaque(frame.to_rgba8(), 256, dither), false);
    }

    quantize_with_transparency(frame.to_rgba8(), dither)
}

/// Standard alpha-over compositing onto an opaque white background.
fn flatten_over_background(frame: &DynamicImage) -> RgbaImage {
    let mut rgba = frame.to_rgba8();
    let [bg_r, bg_g, bg_b] = BACKGROUND_RGB;

    for px in rgba.pixels_mut() {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        let inv = 255 - a;
        px[0] = (mul_div255(u16::from(px[0]), a) + mul_div255(u16::from(bg_r), inv)).min(255) as u8;
        px[1] = (mul_div255(u16::from(px[1]), a) + mul_div255(u16::from(bg_g), inv)).min(255) as u8;
        px[2] = (mul_div255(u16::from(px[2]), a) + mul_div255(u16::from(bg_b), inv)).min(255) as u8;
        px[3] = 255;
    }

    rgba
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

fn quantize_opaque(mut rgba: RgbaImage, max_colors: usize, dither: DitherMode) -> IndexedFrame {
    let nq = NeuQuant::new(NEUQUANT_SAMPLE_FACTOR, max_colors, rgba.as_raw());
    if dither == DitherMode::FloydSteinberg {
        imageops::dither(&mut rgba, &nq);
    }

    let indices = rgba.pixels().map(|p| nq.index_of(&p.0) as u8).collect();
    IndexedFrame {
        width: rgba.width(),
        height: rgba.height(),
        indices,
        palette: nq.color_map_rgb(),
    }
}

fn quantize_with_transparency(mut rgba: RgbaImage, dither: DitherMode) -> (IndexedFrame, bool) {
    let mask: Vec<bool> = rgba.pixels().map(|p| p[3] <= ALPHA_THRESHOLD).collect();
    let had_transparency = mask.iter().any(|&m| m);

    // Train the quantizer on opaque pixels only so masked colors cannot
    // claim palette entries.
    let training: Vec<u8> = rgba
        .pixels()
        .filter(|p| p[3] > ALPHA_THRESHOLD)
        .flat_map(|p| p.0)
        .collect();

    if training.is_empty() {
        // Every pixel is transparent; no palette to build.
        let len = (rgba.width() * rgba.height()) as usize;
        return (
            IndexedFrame {
                width: rgba.width(),
                height: rgba.height(),
                indices: vec![TRANSPARENT_INDEX; len],
                palette: vec![0; 255 * 3],
            },
            had_transparency,
        );
    }

    let nq = NeuQuant::new(NEUQUANT_SAMPLE_FACTOR, 255, &training);
    if dither == DitherMode::FloydSteinberg {
        imageops::dither(&mut rgba, &nq);
    }

    // Masked pixels get the reserved index regardless of what the quantizer
    // would assign there.
    let indices = rgba
        .pixels()
        .zip(&mask)
        .map(|(p, &masked)| {
            if masked {
                TRANSPARENT_INDEX
            } else {
                nq.index_of(&p.0) as u8
            }
        })
        .collect();

    (
        IndexedFrame {
            width: rgba.width(),
            height: rgba.height(),
            indices,
            palette: nq.color_map_rgb(),
        },
        had_transparency,
    )
}

/// Drop palette entries no index references, remapping indices to the
/// compacted palette. Only valid while no index is reserved: callers must
/// skip this when a transparent index is in play so index 255 stays stable.
pub fn compact_palettes(frames: &mut [IndexedFrame]) {
    for frame in frames {
        compact(frame);
    }
}

fn compact(frame: &mut IndexedFrame) {
    let entry_count = frame.palette.len() / 3;
    let mut used = vec![false; entry_count];
    for &idx in &frame.indices {
        if (idx as usize) < entry_count {
            used[idx as usize] = true;
        }
    }

    let mut remap = vec![0u8; entry_count];
    let mut compacted = Vec::new();
    let mut next = 0u8;
    for (i, &keep) in used.iter().enumerate() {
        if keep {
            remap[i] = next;
            compacted.extend_from_slice(&frame.palette[i * 3..i * 3 + 3]);
            next = next.wrapping_add(1);
        }
    }

    for idx in &mut frame.indices {
        // Indices past the palette end have no entry to remap; leave them be.
        if (*idx as usize) < entry_count {
            *idx = remap[*idx as usize];
        }
    }
    frame.palette = compacted;
}
