use serde::{Deserialize, Serialize};

use crate::errors::{BakeError, Result};

/// The ordered sample times of one clip.
///
/// Times are relative to the clip start, in seconds, strictly increasing,
/// starting at zero, spaced at `1 / sample_rate`. Immutable once built; the
/// baker shares one grid with every channel buffer it creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameGrid {
    count: usize,
    times: Vec<f32>,
    sample_rate: f32,
}

impl FrameGrid {
    /// Builds the sample-time grid for `frame_count` frames at
    /// `samples_per_second`. Pure value construction.
    pub fn build(frame_count: usize, samples_per_second: f32) -> Result<Self> {
        if frame_count < 1 {
            return Err(BakeError::InvalidFrameCount(frame_count));
        }
        if !samples_per_second.is_finite() || samples_per_second <= 0.0 {
            return Err(BakeError::InvalidSampleRate(samples_per_second));
        }

        let times = (0..frame_count)
            .map(|i| i as f32 / samples_per_second)
            .collect();

        Ok(Self {
            count: frame_count,
            times,
            sample_rate: samples_per_second,
        })
    }

    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Relative sample times in seconds, one per frame.
    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
