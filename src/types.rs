//! Core types for the wavsplit segmentation pipeline

use std::ops::Range;

use anyhow::{ensure, Result};
use serde::Deserialize;

/// Channel count written to every clip.
pub const MONO: u16 = 1;
/// Sample width in bytes of 16-bit PCM.
pub const PCM16_WIDTH: u16 = 2;
/// Default minimum silent run: 0.1s at 44100 Hz.
pub const DEFAULT_MIN_SILENCE_RUN: usize = 4410;
/// Default silence threshold; samples with `|s| <= 1` are silent.
pub const DEFAULT_SILENCE_THRESHOLD: u16 = 1;

/// Container format shared by the source recording and every clip cut from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatMetadata {
    pub channels: u16,
    /// Bytes per sample (2 for 16-bit PCM)
    pub sample_width: u16,
    /// Frames per second (e.g., 44100)
    pub frame_rate: u32,
}

impl FormatMetadata {
    /// Mono 16-bit PCM at the given frame rate.
    pub fn mono_pcm16(frame_rate: u32) -> Self {
        Self {
            channels: MONO,
            sample_width: PCM16_WIDTH,
            frame_rate,
        }
    }
}

/// Decoded recording (mono, signed 16-bit samples)
#[derive(Debug, Clone)]
pub struct PcmAudio {
    pub samples: Vec<i16>,
    pub format: FormatMetadata,
}

impl PcmAudio {
    pub fn new(samples: Vec<i16>, frame_rate: u32) -> Self {
        Self {
            samples,
            format: FormatMetadata::mono_pcm16(frame_rate),
        }
    }
}

/// Half-open sample interval `[start, end)` of one detected clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipRange {
    pub start: usize,
    pub end: usize,
}

impl ClipRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "clip range start {start} past end {end}");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn start_secs(&self, frame_rate: u32) -> f64 {
        self.start as f64 / frame_rate as f64
    }

    pub fn end_secs(&self, frame_rate: u32) -> f64 {
        self.end as f64 / frame_rate as f64
    }

    pub fn duration_secs(&self, frame_rate: u32) -> f64 {
        self.len() as f64 / frame_rate as f64
    }
}

/// Parameters of the silence segmenter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentParams {
    /// Consecutive silent samples required to close an open clip
    pub min_silence_run: usize,
    /// Largest absolute amplitude still classified as silent
    pub silence_threshold: u16,
    /// Emit a clip still open at end of input instead of dropping it
    pub flush_trailing: bool,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self {
            min_silence_run: DEFAULT_MIN_SILENCE_RUN,
            silence_threshold: DEFAULT_SILENCE_THRESHOLD,
            flush_trailing: false,
        }
    }
}

impl SegmentParams {
    pub fn new(min_silence_run: usize, silence_threshold: u16) -> Self {
        Self {
            min_silence_run,
            silence_threshold,
            flush_trailing: false,
        }
    }

    pub fn with_flush_trailing(mut self, flush: bool) -> Self {
        self.flush_trailing = flush;
        self
    }

    #[inline]
    pub fn is_silent(&self, sample: i16) -> bool {
        sample.unsigned_abs() <= self.silence_threshold
    }
}

/// Segmentation parameters parsed from JSON input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuntimeParams {
    #[serde(default, alias = "minSilenceRun")]
    pub min_silence_run: Option<usize>,
    #[serde(default, alias = "silenceThreshold", alias = "threshold")]
    pub silence_threshold: Option<i64>,
    #[serde(default, alias = "flushTrailing", alias = "keep_trailing")]
    pub flush_trailing: bool,
}

impl RuntimeParams {
    pub fn validate(&self) -> Result<()> {
        if let Some(threshold) = self.silence_threshold {
            ensure!(
                threshold >= 0,
                "silence_threshold must be non-negative, got {}",
                threshold
            );
            ensure!(
                threshold <= i64::from(u16::MAX),
                "silence_threshold {} exceeds the 16-bit amplitude range",
                threshold
            );
        }
        Ok(())
    }

    /// Validate and fill unset fields with the defaults.
    pub fn to_params(&self) -> Result<SegmentParams> {
        self.validate()?;
        let defaults = SegmentParams::default();
        let silence_threshold = match self.silence_threshold {
            Some(t) => u16::try_from(t)?,
            None => defaults.silence_threshold,
        };
        Ok(SegmentParams {
            min_silence_run: self.min_silence_run.unwrap_or(defaults.min_silence_run),
            silence_threshold,
            flush_trailing: self.flush_trailing,
        })
    }
}
