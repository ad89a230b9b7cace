pub mod decoder;
pub mod encoder;
pub mod slicer;

use std::path::Path;

use crate::error::{DecodeError, EncodeError};
use crate::types::{FormatMetadata, PcmAudio};

pub use decoder::{decode_audio, SymphoniaSource};
pub use encoder::{encode_clip, WavSink};

/// Decodes an audio container into a flat sample sequence plus its format.
pub trait SampleSource {
    fn decode(&self, path: &Path) -> Result<PcmAudio, DecodeError>;
}

/// Encodes a sample sequence into one audio container per call.
pub trait SampleSink {
    fn encode(
        &self,
        path: &Path,
        samples: &[i16],
        format: FormatMetadata,
    ) -> Result<(), EncodeError>;
}

impl<T: SampleSource + ?Sized> SampleSource for &T {
    fn decode(&self, path: &Path) -> Result<PcmAudio, DecodeError> {
        (**self).decode(path)
    }
}

impl<T: SampleSink + ?Sized> SampleSink for &T {
    fn encode(
        &self,
        path: &Path,
        samples: &[i16],
        format: FormatMetadata,
    ) -> Result<(), EncodeError> {
        (**self).encode(path, samples, format)
    }
}
