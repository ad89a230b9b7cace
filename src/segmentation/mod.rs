//! Silence segmentation: one left-to-right pass over the samples that opens a
//! clip at the first loud sample and closes it once `min_silence_run` silent
//! samples follow. The closing run is never part of the clip.

use crate::types::{ClipRange, SegmentParams};


/// Pure function to find the clip ranges of a fully decoded recording
pub fn segment(samples: &[i16], params: &SegmentParams) -> Vec<ClipRange> {
    segment_samples(samples.iter().copied(), *params).collect()
}

/// Lazy form of [`segment`] over any forward-only sample source
pub fn segment_samples<I>(samples: I, params: SegmentParams) -> ClipRanges<I::IntoIter>
where
    I: IntoIterator<Item = i16>,
{
    ClipRanges {
        samples: samples.into_iter(),
        scanner: Some(SilenceScanner::new(params)),
    }
}

/// Incremental segmenter state, fed one sample at a time
#[derive(Debug, Clone)]
pub struct SilenceScanner {
    params: SegmentParams,
    position: usize,
    silent_run: usize,
    clip_start: Option<usize>,
}

impl SilenceScanner {
    pub fn new(params: SegmentParams) -> Self {
        Self {
            params,
            position: 0,
            silent_run: 0,
            clip_start: None,
        }
    }

    /// Number of samples consumed so far
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn clip_active(&self) -> bool {
        self.clip_start.is_some()
    }

    /// Feed the next sample; returns a range when this sample closes a clip
    pub fn push(&mut self, sample: i16) -> Option<ClipRange> {
        let index = self.position;
        self.position += 1;

        if !self.params.is_silent(sample) {
            self.clip_start.get_or_insert(index);
            self.silent_run = 0;
            return None;
        }

        self.silent_run += 1;
        if self.silent_run < self.params.min_silence_run {
            return None;
        }
        // silent_run >= min_silence_run, so this cannot underflow
        let end = index + 1 - self.params.min_silence_run;
        self.clip_start
            .take()
            .map(|start| ClipRange::new(start, end))
    }

    /// End of input. The open clip, if any, is only returned when
    /// `flush_trailing` is set; its trailing silent samples are excluded.
    pub fn finish(self) -> Option<ClipRange> {
        let start = self.clip_start?;
        if !self.params.flush_trailing {
            return None;
        }
        Some(ClipRange::new(start, self.position - self.silent_run))
    }
}

/// Iterator returned by [`segment_samples`]
#[derive(Debug)]
pub struct ClipRanges<I> {
    samples: I,
    scanner: Option<SilenceScanner>,
}

impl<I> Iterator for ClipRanges<I>
where
    I: Iterator<Item = i16>,
{
    type Item = ClipRange;

    fn next(&mut self) -> Option<ClipRange> {
        let scanner = self.scanner.as_mut()?;
        for sample in self.samples.by_ref() {
            if let Some(range) = scanner.push(sample) {
                return Some(range);
            }
        }
        self.scanner.take().and_then(SilenceScanner::finish)
    }
}
