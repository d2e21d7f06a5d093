use std::{borrow::Cow, path::Path};

use anyhow::Context as _;
use gif::{DisposalMethod, Repeat};

use crate::{
    error::{FlipbookError, FlipbookResult},
    sequence::FrameSequence,
};

/// Serialize a sequence into an animated GIF byte stream.
///
/// The global palette comes from the first frame; every frame also carries
/// its own adaptive palette. Frames use restore-to-background disposal.
pub fn encode(seq: &FrameSequence) -> FlipbookResult<Vec<u8>> {
    let Some(first) = seq.frames.first() else {
        return Err(FlipbookError::empty_input("no frames to encode"));
    };

    if first.width > u32::from(u16::MAX) || first.height > u32::from(u16::MAX) {
        return Err(FlipbookError::geometry(format!(
            "frame size {}x{} exceeds the GIF maximum of 65535x65535",
            first.width, first.height
        )));
    }

    let width = first.width as u16;
    let height = first.height as u16;
    // GIF stores delays in centiseconds; zero-delay frames confuse most
    // viewers, so clamp to at least one tick.
    let delay_cs = ((f64::from(seq.delay_ms) / 10.0).round()).clamp(1.0, 65535.0) as u16;

    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, width, height, &first.palette)
            .map_err(|e| FlipbookError::encode(format!("gif encoder init: {e}")))?;

        let repeat = if seq.loop_count == 0 {
            Repeat::Infinite
        } else {
            Repeat::Finite(seq.loop_count)
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| FlipbookError::encode(format!("gif repeat metadata: {e}")))?;

        for frame in &seq.frames {
            let gif_frame = gif::Frame {
                width,
                height,
                delay: delay_cs,
                dispose: DisposalMethod::Background,
                transparent: seq.transparent_index,
                palette: Some(frame.palette.clone()),
                buffer: Cow::Borrowed(&frame.indices),
                ..gif::Frame::default()
            };
            encoder
                .write_frame(&gif_frame)
                .map_err(|e| FlipbookError::encode(format!("gif frame write: {e}")))?;
        }
    }

    Ok(out)
}

/// Encode in memory, then write the destination in one shot so a failed run
/// leaves no partial output file. Missing parent directories are created.
/// Returns the number of bytes written.
pub fn write_gif(seq: &FrameSequence, path: &Path) -> FlipbookResult<usize> {
    let bytes = encode(seq)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("write output '{}'", path.display()))?;
    Ok(bytes.len())
}

pub fn ensure_parent_dir(path: &Path) -> FlipbookResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::palette::IndexedFrame;

    use super::*;

    fn tiny_frame(index: u8) -> IndexedFrame {
        IndexedFrame {
            width: 2,
            height: 2,
            indices: vec![index; 4],
            palette: vec![255, 0, 0, 0, 255, 0],
        }
    }

    fn decode_all(bytes: &[u8]) -> (gif::Decoder<Cursor<&[u8]>>, Vec<gif::Frame<'static>>) {
        let mut decoder = gif::DecodeOptions::new()
            .read_info(Cursor::new(bytes))
            .unwrap();
        let mut frames = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            frames.push(frame.clone());
        }
        (decoder, frames)
    }

    #[test]
    fn round_trips_frame_count_delay_and_disposal() {
        let seq = FrameSequence {
            frames: vec![tiny_frame(0), tiny_frame(1)],
            delay_ms: 100,
            loop_count: 0,
            transparent_index: None,
        };

        let bytes = encode(&seq).unwrap();
        assert!(bytes.starts_with(b"GIF89a"));

        let (decoder, frames) = decode_all(&bytes);
        assert_eq!((decoder.width(), decoder.height()), (2, 2));
        assert_eq!(frames.len(), 2);
        for frame in &frames {
            assert_eq!(frame.delay, 10);
            assert_eq!(frame.dispose, DisposalMethod::Background);
            assert_eq!(frame.transparent, None);
        }
    }

    #[test]
    fn transparent_index_is_carried_per_frame() {
        let seq = FrameSequence {
            frames: vec![tiny_frame(0)],
            delay_ms: 40,
            loop_count: 0,
            transparent_index: Some(255),
        };

        let bytes = encode(&seq).unwrap();
        let (_, frames) = decode_all(&bytes);
        assert_eq!(frames[0].transparent, Some(255));
    }

    #[test]
    fn oversized_frames_are_a_geometry_error() {
        let seq = FrameSequence {
            frames: vec![IndexedFrame {
                width: 70_000,
                height: 1,
                indices: vec![],
                palette: vec![0, 0, 0],
            }],
            delay_ms: 100,
            loop_count: 0,
            transparent_index: None,
        };

        assert!(matches!(
            encode(&seq),
            Err(FlipbookError::Geometry(_))
        ));
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let seq = FrameSequence {
            frames: vec![],
            delay_ms: 100,
            loop_count: 0,
            transparent_index: None,
        };
        assert!(matches!(encode(&seq), Err(FlipbookError::EmptyInput(_))));
    }

    #[test]
    fn write_gif_creates_missing_parent_dirs() {
        let seq = FrameSequence {
            frames: vec![tiny_frame(0)],
            delay_ms: 100,
            loop_count: 1,
            transparent_index: None,
        };

        let path = std::path::PathBuf::from("target")
            .join("encode_tests")
            .join("nested")
            .join("out.gif");
        let _ = std::fs::remove_file(&path);

        let written = write_gif(&seq, &path).unwrap();
        assert!(path.exists());
        assert_eq!(
            written as u64,
            std::fs::metadata(&path).unwrap().len()
        );
    }
}
