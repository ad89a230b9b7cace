use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use super::SampleSource;
use crate::error::DecodeError;
use crate::types::{FormatMetadata, PcmAudio, MONO};

/// Sample Source backed by symphonia's format and codec registries
#[derive(Debug, Clone, Copy, Default)]
pub struct SymphoniaSource;

impl SampleSource for SymphoniaSource {
    fn decode(&self, path: &Path) -> Result<PcmAudio, DecodeError> {
        decode_audio(path)
    }
}

/// Decode a mono 16-bit PCM file into memory
pub fn decode_audio<P: AsRef<Path>>(path: P) -> Result<PcmAudio, DecodeError> {
    let path = path.as_ref();

    let file = std::fs::File::open(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(extension);
    }

    let opened = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(DecodeError::Container)?;

    let mut format = opened.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoTrack)?;

    let track_id = track.id;
    let params = &track.codec_params;
    let frame_rate = params.sample_rate.ok_or(DecodeError::MissingFrameRate)?;

    if let Some(channels) = params.channels {
        if channels.count() != usize::from(MONO) {
            return Err(DecodeError::Unsupported(format!(
                "{} channels (only mono is supported)",
                channels.count()
            )));
        }
    }
    if let Some(bits) = params.bits_per_sample {
        if bits != 16 {
            return Err(DecodeError::Unsupported(format!(
                "{bits}-bit samples (only 16-bit is supported)"
            )));
        }
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(params, &DecoderOptions::default())
        .map_err(DecodeError::Codec)?;

    let expected_frames = params.n_frames;
    let mut samples = Vec::with_capacity(expected_frames.unwrap_or(0) as usize);

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err))
                if err.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(err) => return Err(DecodeError::Packet(err)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(DecodeError::Packet)?;
        append_pcm16(&decoded, &mut samples)?;
    }

    // The reader stops quietly at EOF, so a short data chunk only shows up
    // against the frame count in the header.
    if let Some(expected) = expected_frames {
        if samples.len() as u64 != expected {
            return Err(DecodeError::Truncated {
                expected,
                decoded: samples.len() as u64,
            });
        }
    }

    debug!(
        path = %path.display(),
        samples = samples.len(),
        frame_rate,
        "decoded source recording"
    );

    Ok(PcmAudio {
        samples,
        format: FormatMetadata::mono_pcm16(frame_rate),
    })
}

/// Copy a decoded buffer's samples verbatim; anything but mono i16 is rejected
fn append_pcm16(buffer: &AudioBufferRef<'_>, out: &mut Vec<i16>) -> Result<(), DecodeError> {
    let channels = buffer.spec().channels.count();
    if channels != usize::from(MONO) {
        return Err(DecodeError::Unsupported(format!(
            "{channels} channels (only mono is supported)"
        )));
    }

    match buffer {
        AudioBufferRef::S16(buf) => {
            out.extend_from_slice(buf.chan(0));
            Ok(())
        }
        AudioBufferRef::U8(_) | AudioBufferRef::S8(_) => {
            Err(DecodeError::Unsupported("8-bit samples".to_string()))
        }
        AudioBufferRef::U16(_) => Err(DecodeError::Unsupported(
            "unsigned 16-bit samples".to_string(),
        )),
        AudioBufferRef::U24(_) | AudioBufferRef::S24(_) => {
            Err(DecodeError::Unsupported("24-bit samples".to_string()))
        }
        AudioBufferRef::U32(_) | AudioBufferRef::S32(_) => {
            Err(DecodeError::Unsupported("32-bit samples".to_string()))
        }
        AudioBufferRef::F32(_) | AudioBufferRef::F64(_) => Err(DecodeError::Unsupported(
            "floating point samples".to_string(),
        )),
    }
}
