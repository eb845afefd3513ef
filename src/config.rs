use serde::{Deserialize, Serialize};

/// Configuration for one bake session.
///
/// The constant-detection thresholds are per-component absolute tolerances,
/// configured independently per property kind: a channel whose every sampled
/// component stays within the matching threshold of its rest-pose value is
/// considered constant and is dropped (or collapsed to a single keyframe when
/// channels are forced).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BakeConfig {
    /// Uniform rescale applied to all sampled translation components
    /// (global unit conversion, e.g. centimeters to meters).
    pub scale_factor: f32,

    pub constant_translation_threshold: f32,
    pub constant_rotation_threshold: f32,
    pub constant_scaling_threshold: f32,
    pub constant_weights_threshold: f32,

    /// Shear tolerance. A sampled transform whose decomposition deviates from
    /// the authored matrix by more than this is recorded and reported once
    /// per node after sampling. Sampling itself never fails for shear.
    pub max_non_orthogonality: f32,

    /// Emit a full keyframe track even for constant channels.
    pub force_animation_sampling: bool,

    /// Guarantee a uniform channel set across all exported nodes, adding
    /// placeholder channels where the decomposition kind would not otherwise
    /// produce them. Constant channels collapse to a single keyframe instead
    /// of being dropped.
    pub force_animation_channels: bool,

    /// Leave output channels unnamed instead of `<node>/anim/<clip>/<tag>`.
    pub disable_name_assignment: bool,

    /// Sample count for step-function detection. Values above 1 would enable
    /// curve simplification, which is currently a no-op hook: full tracks are
    /// always emitted.
    pub step_detect_sample_count: usize,

    /// Progress is reported once every this many frames.
    pub progress_frame_interval: usize,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            constant_translation_threshold: 1e-5,
            constant_rotation_threshold: 1e-5,
            constant_scaling_threshold: 1e-5,
            constant_weights_threshold: 1e-5,
            max_non_orthogonality: 0.01,
            force_animation_sampling: false,
            force_animation_channels: false,
            disable_name_assignment: false,
            step_detect_sample_count: 1,
            progress_frame_interval: 16,
        }
    }
}
