use crate::types::{ClipRange, PcmAudio};

/// Pure function to cut one clip range out of the source recording.
/// Ranges past the end of the recording are clamped.
pub fn slice_clip(audio: &PcmAudio, range: ClipRange) -> &[i16] {
    let end = range.end.min(audio.samples.len());
    let start = range.start.min(end);
    &audio.samples[start..end]
}
