use crate::{
    error::{FlipbookError, FlipbookResult},
    palette::{IndexedFrame, TRANSPARENT_INDEX},
};

pub const DEFAULT_FRAME_DELAY_MS: u32 = 100;

#[derive(Clone, Copy, Debug)]
pub struct SequenceOptions {
    pub delay_ms: u32,
    /// 0 = loop forever.
    pub loop_count: u16,
    /// Append a reversed copy of the sequence, excluding both endpoints, for
    /// a seamless back-and-forth loop.
    pub reverse: bool,
}

/// The assembled animation, ready for an encoder.
///
/// Frames are encoded with restore-to-background disposal so transparent
/// regions of one frame do not inherit pixel content from the previous one.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    pub frames: Vec<IndexedFrame>,
    /// Uniform per-frame display duration in milliseconds.
    pub delay_ms: u32,
    /// 0 = loop forever.
    pub loop_count: u16,
    /// The reserved global transparency index, present only when
    /// transparency was requested and at least one pixel was actually
    /// masked. Fully opaque sequences carry no transparency metadata.
    pub transparent_index: Option<u8>,
}

/// Derive the uniform per-frame delay from either a frame rate or an
/// explicit duration. The two are mutually exclusive; with neither given the
/// delay defaults to [`DEFAULT_FRAME_DELAY_MS`].
pub fn frame_delay_ms(fps: Option<f32>, duration_ms: Option<f64>) -> FlipbookResult<u32> {
    match (fps, duration_ms) {
        (Some(_), Some(_)) => Err(FlipbookError::config(
            "--fps and --duration are mutually exclusive",
        )),
        (Some(fps), None) => {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(FlipbookError::config(format!(
                    "fps must be > 0 (got {fps})"
                )));
            }
            Ok(((1000.0 / f64::from(fps)).round() as u32).max(1))
        }
        (None, Some(ms)) => {
            if !ms.is_finite() || ms <= 0.0 {
                return Err(FlipbookError::config(format!(
                    "frame duration must be > 0 ms (got {ms})"
                )));
            }
            Ok((ms.round() as u32).max(1))
        }
        (None, None) => Ok(DEFAULT_FRAME_DELAY_MS),
    }
}

pub fn assemble(
    mut frames: Vec<IndexedFrame>,
    any_transparent: bool,
    opts: SequenceOptions,
) -> FlipbookResult<FrameSequence> {
    let Some(first) = frames.first() else {
        return Err(FlipbookError::empty_input("no frames to assemble"));
    };

    let (width, height) = (first.width, first.height);
    if let Some(bad) = frames
        .iter()
        .find(|f| f.width != width || f.height != height)
    {
        return Err(FlipbookError::geometry(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            bad.width, bad.height, width, height
        )));
    }

    if opts.reverse && frames.len() > 1 {
        // [0..N-1] followed by [N-2..1]: neither endpoint is duplicated.
        let tail: Vec<IndexedFrame> = frames[1..frames.len() - 1]
            .iter()
            .rev()
            .cloned()
            .collect();
        frames.extend(tail);
    }

    Ok(FrameSequence {
        frames,
        delay_ms: opts.delay_ms,
        loop_count: opts.loop_count,
        transparent_index: any_transparent.then_some(TRANSPARENT_INDEX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged_frame(tag: u8) -> IndexedFrame {
        IndexedFrame {
            width: 1,
            height: 1,
            indices: vec![tag],
            palette: vec![0, 0, 0],
        }
    }

    fn opts(reverse: bool) -> SequenceOptions {
        SequenceOptions {
            delay_ms: 100,
            loop_count: 0,
            reverse,
        }
    }

    #[test]
    fn fps_derivation_rounds_to_milliseconds() {
        assert_eq!(frame_delay_ms(Some(10.0), None).unwrap(), 100);
        assert_eq!(frame_delay_ms(Some(3.0), None).unwrap(), 333);
    }

    #[test]
    fn explicit_duration_rounds() {
        assert_eq!(frame_delay_ms(None, Some(41.7)).unwrap(), 42);
    }

    #[test]
    fn default_delay_is_100ms() {
        assert_eq!(frame_delay_ms(None, None).unwrap(), DEFAULT_FRAME_DELAY_MS);
    }

    #[test]
    fn fps_and_duration_are_mutually_exclusive() {
        assert!(matches!(
            frame_delay_ms(Some(10.0), Some(100.0)),
            Err(FlipbookError::Config(_))
        ));
    }

    #[test]
    fn non_positive_rates_are_rejected() {
        assert!(frame_delay_ms(Some(0.0), None).is_err());
        assert!(frame_delay_ms(Some(-5.0), None).is_err());
        assert!(frame_delay_ms(None, Some(0.0)).is_err());
    }

    #[test]
    fn reverse_excludes_both_endpoints() {
        let frames = (0..4).map(tagged_frame).collect();
        let seq = assemble(frames, false, opts(true)).unwrap();

        let tags: Vec<u8> = seq.frames.iter().map(|f| f.indices[0]).collect();
        assert_eq!(tags, vec![0, 1, 2, 3, 2, 1]);
    }

    #[test]
    fn reverse_of_short_sequences_is_a_no_op() {
        let seq = assemble(vec![tagged_frame(0)], false, opts(true)).unwrap();
        assert_eq!(seq.frames.len(), 1);

        let seq = assemble(
            vec![tagged_frame(0), tagged_frame(1)],
            false,
            opts(true),
        )
        .unwrap();
        assert_eq!(seq.frames.len(), 2);
    }

    #[test]
    fn opaque_sequences_carry_no_transparency_metadata() {
        let seq = assemble(vec![tagged_frame(0)], false, opts(false)).unwrap();
        assert_eq!(seq.transparent_index, None);
    }

    #[test]
    fn masked_sequences_reserve_index_255() {
        let seq = assemble(vec![tagged_frame(0)], true, opts(false)).unwrap();
        assert_eq!(seq.transparent_index, Some(TRANSPARENT_INDEX));
    }

    #[test]
    fn mismatched_frame_sizes_are_rejected() {
        let mut odd = tagged_frame(1);
        odd.width = 2;
        odd.indices = vec![1, 1];

        let err = assemble(vec![tagged_frame(0), odd], false, opts(false)).unwrap_err();
        assert!(matches!(err, FlipbookError::Geometry(_)));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(
            assemble(vec![], false, opts(false)),
            Err(FlipbookError::EmptyInput(_))
        ));
    }
}
