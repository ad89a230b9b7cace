//! Decode -> segment -> encode-per-clip.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::audio::slicer::slice_clip;
use crate::audio::{SampleSink, SampleSource, SymphoniaSource, WavSink};
use crate::config::AppConfig;
use crate::error::{SourcePathError, SplitError};
use crate::segmentation::segment;
use crate::types::{ClipRange, FormatMetadata, PcmAudio, SegmentParams};

/// One clip that made it to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenClip {
    pub index: usize,
    pub range: ClipRange,
    pub path: PathBuf,
}

/// Outcome of a successful split
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub source: PathBuf,
    pub format: FormatMetadata,
    pub total_samples: usize,
    pub clips: Vec<WrittenClip>,
}

/// Split `source` into clips under the configured output directory using the
/// symphonia decoder and the hound WAV writer.
pub fn split_file(
    source: Option<&Path>,
    config: &AppConfig,
    params: &SegmentParams,
) -> Result<SplitReport, SplitError> {
    split_audio(&SymphoniaSource, &WavSink, source, config, params)
}

/// Same as [`split_file`] with caller-supplied collaborators
pub fn split_audio<S, K>(
    decoder: &S,
    sink: &K,
    source: Option<&Path>,
    config: &AppConfig,
    params: &SegmentParams,
) -> Result<SplitReport, SplitError>
where
    S: SampleSource + ?Sized,
    K: SampleSink + ?Sized,
{
    let (source, stem) = validate_source(source)?;
    let output_dir = config.prepare_output_dir()?;

    let audio = decoder
        .decode(&source)
        .map_err(|err| SplitError::Decode {
            path: source.clone(),
            source: err,
        })?;
    info!(
        path = %source.display(),
        samples = audio.samples.len(),
        frame_rate = audio.format.frame_rate,
        "loaded recording"
    );

    let ranges = segment(&audio.samples, params);
    info!(
        clips = ranges.len(),
        min_silence_run = params.min_silence_run,
        silence_threshold = params.silence_threshold,
        "segmented recording"
    );

    let clips = write_clips(sink, &audio, &ranges, output_dir, &stem)?;

    Ok(SplitReport {
        source,
        format: audio.format,
        total_samples: audio.samples.len(),
        clips,
    })
}

/// Encode each range in detection order; the first failure stops the run.
pub fn write_clips<K>(
    sink: &K,
    audio: &PcmAudio,
    ranges: &[ClipRange],
    output_dir: &Path,
    stem: &str,
) -> Result<Vec<WrittenClip>, SplitError>
where
    K: SampleSink + ?Sized,
{
    let mut written = Vec::with_capacity(ranges.len());
    for (index, &range) in ranges.iter().enumerate() {
        let path = clip_path(output_dir, stem, index);
        let samples = slice_clip(audio, range);
        if let Err(source) = sink.encode(&path, samples, audio.format) {
            warn!(
                index,
                written = written.len(),
                path = %path.display(),
                "clip write failed; aborting remaining clips"
            );
            return Err(SplitError::Encode {
                index,
                written: written.len(),
                path,
                source,
            });
        }
        debug!(
            index,
            start = range.start,
            end = range.end,
            path = %path.display(),
            "wrote clip"
        );
        written.push(WrittenClip { index, range, path });
    }
    Ok(written)
}

/// `<dir>/<stem>_<index>.wav`
pub fn clip_path(output_dir: &Path, stem: &str, index: usize) -> PathBuf {
    output_dir.join(format!("{stem}_{index}.wav"))
}

/// Check the source path and derive the base name used for clip files.
pub fn validate_source(path: Option<&Path>) -> Result<(PathBuf, String), SourcePathError> {
    let path = match path {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => return Err(SourcePathError::Missing),
    };
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| SourcePathError::Malformed(path.to_path_buf()))?;
    if !path.exists() {
        return Err(SourcePathError::NotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(SourcePathError::NotAFile(path.to_path_buf()));
    }
    Ok((path.to_path_buf(), stem))
}
