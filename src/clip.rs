use serde::{Deserialize, Serialize};

use crate::scene::NodeId;

/// The animated property a channel drives, in the target runtime format's
/// terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelProperty {
    Translation, // 3 components
    Rotation,    // 4 components (quaternion x, y, z, w)
    Scale,       // 3 components
    Weights,     // morph-target count components
}

/// Which synthetic output node a channel targets.
///
/// A node whose authored transform round-trips through a single TRS exports
/// as one (primary) output node. Complex decompositions split into a
/// primary/secondary pair so the runtime can recombine the original pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelTarget {
    pub node: NodeId,
    pub role: NodeRole,
}

/// One finalized output animation channel: explicit keyframe times plus a
/// flat value stream, ready for direct serialization into the runtime
/// format's channel layout.
///
/// `times.len()` is either 1 (a constant/step-style track needing no
/// interpolation) or the clip's full frame count (a fully sampled linear
/// track at the clip's fixed frame rate). `values.len()` is always
/// `times.len() * dimension`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub target: ChannelTarget,
    pub property: ChannelProperty,
    pub times: Vec<f32>,
    pub values: Vec<f32>,
    pub dimension: usize,
}

impl Channel {
    #[inline]
    #[must_use]
    pub fn keyframe_count(&self) -> usize {
        self.times.len()
    }

    /// True for single-keyframe tracks emitted for constant properties.
    #[inline]
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.times.len() == 1
    }
}

/// One named, time-bounded animation export unit.
///
/// Written once by a bake, read by the document writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    pub channels: Vec<Channel>,
}

impl AnimationClip {
    #[must_use]
    pub fn new(name: String) -> Self {
        Self {
            name,
            channels: Vec::new(),
        }
    }

    /// All channels targeting the given scene node, either synthetic role.
    pub fn channels_for(&self, node: NodeId) -> impl Iterator<Item = &Channel> {
        self.channels.iter().filter(move |c| c.target.node == node)
    }
}
