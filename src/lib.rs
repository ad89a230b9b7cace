//! Split mono 16-bit PCM recordings into clips separated by silence.

pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod segmentation;
pub mod types;

pub use error::{DecodeError, EncodeError, OutputDirError, SourcePathError, SplitError};
pub use pipeline::{split_audio, split_file, SplitReport, WrittenClip};
pub use segmentation::{segment, segment_samples, SilenceScanner};
pub use types::{ClipRange, FormatMetadata, PcmAudio, SegmentParams};
