use std::path::Path;

use super::SampleSink;
use crate::error::EncodeError;
use crate::types::{FormatMetadata, MONO, PCM16_WIDTH};

/// Sample Sink writing RIFF/WAVE files through hound
#[derive(Debug, Clone, Copy, Default)]
pub struct WavSink;

impl SampleSink for WavSink {
    fn encode(
        &self,
        path: &Path,
        samples: &[i16],
        format: FormatMetadata,
    ) -> Result<(), EncodeError> {
        if format.channels != MONO || format.sample_width != PCM16_WIDTH {
            return Err(EncodeError::UnsupportedFormat {
                channels: format.channels,
                sample_width: format.sample_width,
            });
        }
        encode_clip(path, samples, format.frame_rate)
    }
}

/// Encode mono 16-bit samples to a WAV file at the given frame rate
pub fn encode_clip<P: AsRef<Path>>(
    path: P,
    samples: &[i16],
    frame_rate: u32,
) -> Result<(), EncodeError> {
    let path = path.as_ref();

    let spec = hound::WavSpec {
        channels: MONO,
        sample_rate: frame_rate,
        bits_per_sample: PCM16_WIDTH * 8,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|source| EncodeError::Create {
            path: path.to_path_buf(),
            source,
        })?;

    for &sample in samples {
        writer.write_sample(sample).map_err(EncodeError::Write)?;
    }

    writer.finalize().map_err(EncodeError::Finalize)?;

    Ok(())
}
