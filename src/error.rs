//! Error taxonomy for the split pipeline.

use std::io;
use std::path::PathBuf;

use symphonia::core::errors::Error as SymphoniaError;
use thiserror::Error;

/// Problems with the `-s` source path, detected before any decoding.
#[derive(Debug, Error)]
pub enum SourcePathError {
    #[error("no source path supplied")]
    Missing,
    #[error("source path {0:?} has no file name to derive clip names from")]
    Malformed(PathBuf),
    #[error("source file {0:?} not found")]
    NotFound(PathBuf),
    #[error("source path {0:?} is not a regular file")]
    NotAFile(PathBuf),
}

/// Problems preparing the clip output directory.
#[derive(Debug, Error)]
pub enum OutputDirError {
    #[error("output path {0:?} exists and is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to create output directory {path:?}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to resolve the running executable's directory")]
    ExecutableLocation(#[source] io::Error),
}

/// Sample Source failures. The segmenter never sees partially decoded audio.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to open audio file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unrecognized or corrupt audio container")]
    Container(#[source] SymphoniaError),
    #[error("no audio tracks found in file")]
    NoTrack,
    #[error("frame rate not specified in audio file")]
    MissingFrameRate,
    #[error("failed to create decoder")]
    Codec(#[source] SymphoniaError),
    #[error("failed to decode audio packet")]
    Packet(#[source] SymphoniaError),
    #[error("audio data truncated: header declares {expected} frames, decoded {decoded}")]
    Truncated { expected: u64, decoded: u64 },
    #[error("unsupported audio encoding: {0}")]
    Unsupported(String),
}

/// Sample Sink failures.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("only mono 16-bit PCM output is supported (got {channels} channel(s), {sample_width} byte samples)")]
    UnsupportedFormat { channels: u16, sample_width: u16 },
    #[error("failed to create WAV file {path:?}")]
    Create {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("failed to write audio sample")]
    Write(#[source] hound::Error),
    #[error("failed to finalize WAV file")]
    Finalize(#[source] hound::Error),
}

/// Top-level error returned by the split pipeline.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error(transparent)]
    SourcePath(#[from] SourcePathError),
    #[error(transparent)]
    OutputDir(#[from] OutputDirError),
    #[error("failed to decode {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },
    #[error("failed to write clip {index} to {path:?} ({written} clip(s) already written)")]
    Encode {
        index: usize,
        written: usize,
        path: PathBuf,
        #[source]
        source: EncodeError,
    },
}

impl SplitError {
    /// Number of clips already on disk when the error occurred.
    pub fn clips_written(&self) -> usize {
        match self {
            Self::Encode { written, .. } => *written,
            _ => 0,
        }
    }
}
