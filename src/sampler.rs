//! Per-node channel routing and sampling.
//!
//! Each exportable node gets one sampler whose channel set is fixed at
//! construction by the node's [`TransformKind`]. The routing from decomposed
//! TRS components into channels is data, not control flow: every kind owns a
//! static table of [`ChannelRoute`] entries consulted both when appending
//! frame samples and when finalizing.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::channel::{ChannelBuffer, Finalized};
use crate::clip::{AnimationClip, ChannelProperty, ChannelTarget, NodeRole};
use crate::config::BakeConfig;
use crate::frames::FrameGrid;
use crate::scene::{AnimSource, NodeDesc, TransformKind};
use crate::transform::{TransformCache, TransformState, Trs};

/// Offending-timestamp capacity. A representative sample for diagnostics,
/// not an exhaustive record; recording stops once full.
const MAX_RECORDED_SHEAR_TIMES: usize = 10;

#[derive(Debug, Clone, Copy)]
enum TrsSource {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy)]
enum TrsComponent {
    Translation,
    Rotation,
    Scale,
}

#[derive(Debug, Clone, Copy)]
enum ThresholdKind {
    Translation,
    Rotation,
    Scale,
    /// Placeholder channels compare against a zero threshold so they are
    /// never considered constant and always emit full tracks.
    Forced,
}

/// One row of a decomposition kind's channel table: which TRS component
/// feeds the channel, which synthetic node it targets, and how it finalizes.
struct ChannelRoute {
    tag: &'static str,
    property: ChannelProperty,
    role: NodeRole,
    source: TrsSource,
    component: TrsComponent,
    threshold: ThresholdKind,
    /// Present only when `force_animation_channels` is set.
    forced_only: bool,
}

const SIMPLE_ROUTES: &[ChannelRoute] = &[
    ChannelRoute {
        tag: "T",
        property: ChannelProperty::Translation,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Translation,
        threshold: ThresholdKind::Translation,
        forced_only: false,
    },
    ChannelRoute {
        tag: "R",
        property: ChannelProperty::Rotation,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Rotation,
        threshold: ThresholdKind::Rotation,
        forced_only: false,
    },
    ChannelRoute {
        tag: "S",
        property: ChannelProperty::Scale,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Scale,
        threshold: ThresholdKind::Scale,
        forced_only: false,
    },
];

const COMPLEX_JOINT_ROUTES: &[ChannelRoute] = &[
    ChannelRoute {
        tag: "T",
        property: ChannelProperty::Translation,
        role: NodeRole::Secondary,
        source: TrsSource::Secondary,
        component: TrsComponent::Translation,
        threshold: ThresholdKind::Translation,
        forced_only: false,
    },
    ChannelRoute {
        tag: "R",
        property: ChannelProperty::Rotation,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Rotation,
        threshold: ThresholdKind::Rotation,
        forced_only: false,
    },
    ChannelRoute {
        tag: "S",
        property: ChannelProperty::Scale,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Scale,
        threshold: ThresholdKind::Scale,
        forced_only: false,
    },
    // Corrector: the secondary node's scale carries the inherited-scale
    // cancellation so the split pair recombines to the authored pose.
    ChannelRoute {
        tag: "C",
        property: ChannelProperty::Scale,
        role: NodeRole::Secondary,
        source: TrsSource::Secondary,
        component: TrsComponent::Scale,
        threshold: ThresholdKind::Scale,
        forced_only: false,
    },
    ChannelRoute {
        tag: "DT",
        property: ChannelProperty::Translation,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Translation,
        threshold: ThresholdKind::Forced,
        forced_only: true,
    },
    ChannelRoute {
        tag: "DR",
        property: ChannelProperty::Rotation,
        role: NodeRole::Secondary,
        source: TrsSource::Secondary,
        component: TrsComponent::Rotation,
        threshold: ThresholdKind::Forced,
        forced_only: true,
    },
];

const COMPLEX_TRANSFORM_ROUTES: &[ChannelRoute] = &[
    ChannelRoute {
        tag: "T",
        property: ChannelProperty::Translation,
        role: NodeRole::Secondary,
        source: TrsSource::Secondary,
        component: TrsComponent::Translation,
        threshold: ThresholdKind::Translation,
        forced_only: false,
    },
    ChannelRoute {
        tag: "R",
        property: ChannelProperty::Rotation,
        role: NodeRole::Secondary,
        source: TrsSource::Secondary,
        component: TrsComponent::Rotation,
        threshold: ThresholdKind::Rotation,
        forced_only: false,
    },
    ChannelRoute {
        tag: "S",
        property: ChannelProperty::Scale,
        role: NodeRole::Secondary,
        source: TrsSource::Secondary,
        component: TrsComponent::Scale,
        threshold: ThresholdKind::Scale,
        forced_only: false,
    },
    // Corrector: the primary node's pivot translation. Finalized against the
    // scale threshold, matching the joint corrector.
    ChannelRoute {
        tag: "C",
        property: ChannelProperty::Translation,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Translation,
        threshold: ThresholdKind::Scale,
        forced_only: false,
    },
    ChannelRoute {
        tag: "DS",
        property: ChannelProperty::Scale,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Scale,
        threshold: ThresholdKind::Forced,
        forced_only: true,
    },
    ChannelRoute {
        tag: "DR",
        property: ChannelProperty::Rotation,
        role: NodeRole::Primary,
        source: TrsSource::Primary,
        component: TrsComponent::Rotation,
        threshold: ThresholdKind::Forced,
        forced_only: true,
    },
];

fn routes_for(kind: TransformKind) -> &'static [ChannelRoute] {
    match kind {
        TransformKind::Simple => SIMPLE_ROUTES,
        TransformKind::ComplexJoint => COMPLEX_JOINT_ROUTES,
        TransformKind::ComplexTransform => COMPLEX_TRANSFORM_ROUTES,
    }
}

fn component_of(trs: &Trs, component: TrsComponent) -> SmallVec<[f32; 4]> {
    match component {
        TrsComponent::Translation => SmallVec::from_slice(&trs.translation.to_array()),
        TrsComponent::Rotation => SmallVec::from_slice(&trs.rotation.to_array()),
        TrsComponent::Scale => SmallVec::from_slice(&trs.scale.to_array()),
    }
}

/// Consolidated shear diagnostics for one node, available after sampling.
#[derive(Debug, Clone, Copy)]
pub struct ShearReport<'a> {
    /// Worst observed deviation (fraction, not percent).
    pub worst: f32,
    /// Recorded offending absolute times, capped at the recorder capacity.
    pub times: &'a [f32],
}

/// Samples one scene node into its channel buffers, frame by frame, then
/// finalizes them into output channels.
pub struct NodeAnimationSampler {
    node: NodeDesc,
    rest: TransformState,
    routes: Vec<&'static ChannelRoute>,
    buffers: Vec<ChannelBuffer>,
    weights: Option<ChannelBuffer>,
    worst_shear: f32,
    shear_times: SmallVec<[f32; MAX_RECORDED_SHEAR_TIMES]>,
}

impl NodeAnimationSampler {
    pub fn new<S: AnimSource>(
        scene: &S,
        node: NodeDesc,
        grid: &Arc<FrameGrid>,
        config: &BakeConfig,
    ) -> Self {
        let rest = TransformState::decompose(
            scene.rest_matrix(node.id),
            node.kind,
            scene.scale_compensation(node.id),
            scene.pivot_translation(node.id),
            config.scale_factor,
        );

        let routes: Vec<&'static ChannelRoute> = routes_for(node.kind)
            .iter()
            .filter(|route| !route.forced_only || config.force_animation_channels)
            .collect();

        let buffers = routes
            .iter()
            .map(|route| {
                let dimension = match route.component {
                    TrsComponent::Rotation => 4,
                    TrsComponent::Translation | TrsComponent::Scale => 3,
                };
                ChannelBuffer::new(
                    grid.clone(),
                    ChannelTarget {
                        node: node.id,
                        role: route.role,
                    },
                    route.property,
                    dimension,
                )
            })
            .collect();

        let weights = (node.morph_target_count > 0).then(|| {
            ChannelBuffer::new(
                grid.clone(),
                ChannelTarget {
                    node: node.id,
                    role: NodeRole::Primary,
                },
                ChannelProperty::Weights,
                node.morph_target_count,
            )
        });

        Self {
            node,
            rest,
            routes,
            buffers,
            weights,
            worst_shear: 0.0,
            shear_times: SmallVec::new(),
        }
    }

    /// Number of channel buffers this sampler accumulates, weights included.
    #[must_use]
    pub fn buffer_count(&self) -> usize {
        self.buffers.len() + usize::from(self.weights.is_some())
    }

    /// Shear diagnostics recorded so far, if any transform exceeded the
    /// configured tolerance.
    #[must_use]
    pub fn shear_report(&self) -> Option<ShearReport<'_>> {
        (!self.shear_times.is_empty()).then(|| ShearReport {
            worst: self.worst_shear,
            times: &self.shear_times,
        })
    }

    /// Samples this node at the scene's current cursor time into every
    /// channel buffer.
    ///
    /// Shear beyond the configured tolerance is recorded (bounded) and the
    /// frame still samples normally; the unrepresentable part is simply not
    /// carried into any channel.
    pub fn sample_at<S: AnimSource>(
        &mut self,
        scene: &S,
        time: f32,
        frame_index: usize,
        cache: &mut TransformCache,
        config: &BakeConfig,
    ) {
        debug_assert_eq!(
            self.buffers[0].frames_sampled(),
            frame_index,
            "frames must be sampled exactly once, in order"
        );

        let state = *cache.get(scene, &self.node, config.scale_factor);

        if state.max_non_orthogonality > config.max_non_orthogonality {
            self.worst_shear = self.worst_shear.max(state.max_non_orthogonality);
            if self.shear_times.len() < MAX_RECORDED_SHEAR_TIMES {
                self.shear_times.push(time);
            }
        }

        for (route, buffer) in self.routes.iter().zip(self.buffers.iter_mut()) {
            let trs = match route.source {
                TrsSource::Primary => &state.primary,
                TrsSource::Secondary => &state.secondary,
            };
            match route.component {
                TrsComponent::Rotation => buffer.append_quaternion(trs.rotation),
                component => buffer.append(&component_of(trs, component)),
            }
        }

        if let Some(buffer) = &mut self.weights {
            let weights = scene.morph_weights(self.node.id);
            assert_eq!(
                weights.len(),
                self.node.morph_target_count,
                "scene reported a different weight count than declared"
            );
            buffer.append(&weights);
        }
    }

    /// Finalizes every channel buffer against the node's rest pose and
    /// appends the surviving channels to the clip.
    ///
    /// Any recorded shear is reported here as a single consolidated warning.
    pub fn export_to<S: AnimSource>(
        self,
        scene: &S,
        clip: &mut AnimationClip,
        config: &BakeConfig,
    ) {
        if !self.shear_times.is_empty() {
            let times = self
                .shear_times
                .iter()
                .map(|t| format!("{t:.3}s"))
                .collect::<Vec<_>>()
                .join(", ");
            log::warn!(
                "node '{}': animated transform contains shear that TRS channels cannot \
                 represent (largest deviation {:.2}%); first seen at: {times}",
                self.node.name,
                self.worst_shear * 100.0,
            );
        }

        let clip_name = clip.name.clone();
        for (route, buffer) in self.routes.iter().zip(self.buffers) {
            let trs = match route.source {
                TrsSource::Primary => &self.rest.primary,
                TrsSource::Secondary => &self.rest.secondary,
            };
            let base = component_of(trs, route.component);
            let threshold = match route.threshold {
                ThresholdKind::Translation => config.constant_translation_threshold,
                ThresholdKind::Rotation => config.constant_rotation_threshold,
                ThresholdKind::Scale => config.constant_scaling_threshold,
                ThresholdKind::Forced => 0.0,
            };
            let name = channel_name(config, &self.node.name, &clip_name, route.tag);
            let outcome = buffer.finalize(
                name,
                &base,
                threshold,
                config.force_animation_sampling,
                config.force_animation_channels,
                config.step_detect_sample_count,
            );
            push_outcome(clip, outcome, &self.node.name, route.tag);
        }

        if let Some(buffer) = self.weights {
            let base = scene.rest_morph_weights(self.node.id);
            assert_eq!(
                base.len(),
                self.node.morph_target_count,
                "scene reported a different rest weight count than declared"
            );
            let name = channel_name(config, &self.node.name, &clip_name, "W");
            let outcome = buffer.finalize(
                name,
                &base,
                config.constant_weights_threshold,
                config.force_animation_sampling,
                config.force_animation_channels,
                config.step_detect_sample_count,
            );
            push_outcome(clip, outcome, &self.node.name, "W");
        }
    }
}

fn channel_name(config: &BakeConfig, node: &str, clip: &str, tag: &str) -> String {
    if config.disable_name_assignment {
        String::new()
    } else {
        format!("{node}/anim/{clip}/{tag}")
    }
}

fn push_outcome(clip: &mut AnimationClip, outcome: Finalized, node: &str, tag: &str) {
    match outcome {
        Finalized::Dropped => {
            log::debug!("node '{node}': dropping constant channel {tag}");
        }
        Finalized::Single(channel) | Finalized::Full(channel) => clip.channels.push(channel),
    }
}
