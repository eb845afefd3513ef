use std::sync::Arc;

use glam::Quat;

use crate::clip::{Channel, ChannelProperty, ChannelTarget};
use crate::frames::FrameGrid;

/// Outcome of finalizing a [`ChannelBuffer`].
///
/// Constant properties are dropped by default (truly static properties need
/// no keyframes), collapse to a single keyframe when a channel is forced,
/// and otherwise emit the full sampled track.
#[derive(Debug)]
pub enum Finalized {
    Dropped,
    Single(Channel),
    Full(Channel),
}

impl Finalized {
    #[must_use]
    pub fn into_channel(self) -> Option<Channel> {
        match self {
            Finalized::Dropped => None,
            Finalized::Single(channel) | Finalized::Full(channel) => Some(channel),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dropped(&self) -> bool {
        matches!(self, Finalized::Dropped)
    }
}

/// Append-only sample buffer for one animation property.
///
/// Grows by exactly one block of `dimension` floats per sampled frame, in
/// frame order; after all frames it holds exactly
/// `grid.count() * dimension` floats. Violating the append contract is an
/// internal invariant breach and panics.
#[derive(Debug)]
pub struct ChannelBuffer {
    grid: Arc<FrameGrid>,
    target: ChannelTarget,
    property: ChannelProperty,
    dimension: usize,
    samples: Vec<f32>,
}

impl ChannelBuffer {
    #[must_use]
    pub fn new(
        grid: Arc<FrameGrid>,
        target: ChannelTarget,
        property: ChannelProperty,
        dimension: usize,
    ) -> Self {
        assert!(dimension > 0, "channel dimension must be non-zero");
        let samples = Vec::with_capacity(grid.count() * dimension);
        Self {
            grid,
            target,
            property,
            dimension,
            samples,
        }
    }

    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Number of complete frames appended so far.
    #[inline]
    #[must_use]
    pub fn frames_sampled(&self) -> usize {
        self.samples.len() / self.dimension
    }

    /// Appends one frame's sample block.
    pub fn append(&mut self, values: &[f32]) {
        assert_eq!(
            values.len(),
            self.dimension,
            "sample block does not match channel dimension"
        );
        assert!(
            self.frames_sampled() < self.grid.count(),
            "appended more frames than the grid holds"
        );
        self.samples.extend_from_slice(values);
    }

    /// Appends one frame's quaternion sample as x, y, z, w.
    ///
    /// Sign continuity is not resolved here: flips across frames are
    /// tolerated by the consuming runtime, so no unwrapping is performed.
    pub fn append_quaternion(&mut self, value: Quat) {
        assert_eq!(self.dimension, 4, "quaternion append on a non-4D channel");
        self.append(&value.to_array());
    }

    /// Converts the accumulated samples into an output channel, or drops
    /// them.
    ///
    /// Every sampled block is compared component-wise against `base_values`
    /// (the node's rest-pose value for this property) within
    /// `constant_threshold`. A constant buffer is dropped unless a flag keeps
    /// it; a kept-constant buffer emits one keyframe at time 0; anything else
    /// emits all keyframes verbatim. `step_detect_sample_count` is the
    /// curve-simplification hook: at 1 (the only supported configuration) the
    /// reduction is skipped entirely and full tracks are emitted.
    #[must_use]
    pub fn finalize(
        self,
        name: String,
        base_values: &[f32],
        constant_threshold: f32,
        force_sampling: bool,
        force_channel: bool,
        step_detect_sample_count: usize,
    ) -> Finalized {
        assert_eq!(
            base_values.len(),
            self.dimension,
            "base values do not match channel dimension"
        );
        assert_eq!(
            self.frames_sampled(),
            self.grid.count(),
            "finalize called before all frames were sampled"
        );

        let is_constant = self.samples.chunks_exact(self.dimension).all(|block| {
            block
                .iter()
                .zip(base_values)
                .all(|(sample, base)| (sample - base).abs() < constant_threshold)
        });

        if is_constant && !force_sampling && !force_channel {
            return Finalized::Dropped;
        }

        let use_single_key = is_constant && !force_sampling;
        if use_single_key {
            // Every sample matched the rest pose, so any one block represents
            // the whole track.
            let values = self.samples[..self.dimension].to_vec();
            Finalized::Single(Channel {
                name,
                target: self.target,
                property: self.property,
                times: vec![0.0],
                values,
                dimension: self.dimension,
            })
        } else {
            let _ = step_detect_sample_count;
            Finalized::Full(Channel {
                name,
                target: self.target,
                property: self.property,
                times: self.grid.times().to_vec(),
                values: self.samples,
                dimension: self.dimension,
            })
        }
    }
}
