//! The host scene collaborator.
//!
//! The scene owns the hierarchy, the per-frame evaluation and the current
//! time cursor; this crate only drives it. [`AnimSource`] is the seam: the
//! baker advances the cursor frame by frame (a required, observable side
//! effect) and reads back, per node, the authored local transform and the
//! live morph weights at that time.

use glam::{Mat4, Vec3};

use crate::errors::Result;

/// Opaque host-owned node identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct NodeId(pub u32);

/// The fixed strategy by which a node's authored transform maps onto output
/// nodes, decided by the host once per export.
///
/// `Simple` transforms round-trip exactly through one TRS triple. The two
/// complex kinds split across a primary/secondary output pair connected by a
/// corrective channel, because some authored component (joint orientation, a
/// rotate/scale pivot) cannot be folded into a single TRS without altering
/// rest-pose geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TransformKind {
    Simple,
    ComplexJoint,
    ComplexTransform,
}

/// Per-node export descriptor reported by the scene.
#[derive(Debug, Clone)]
pub struct NodeDesc {
    pub id: NodeId,
    pub name: String,
    pub kind: TransformKind,
    /// Number of blend shapes on the node's mesh; 0 for none.
    pub morph_target_count: usize,
    /// Nodes reported as not animatable are skipped entirely.
    pub animated: bool,
}

/// A live, mutable scene that can be scrubbed to a time and queried.
///
/// The time cursor is process-wide mutable state: advancing it re-evaluates
/// every node, so the baker holds the only `&mut` borrow for the duration of
/// a bake and samples frames in strictly increasing time order.
pub trait AnimSource {
    /// Moves the scene's time cursor to an absolute time in seconds, forcing
    /// a full re-evaluation of all transforms and weights.
    fn advance_to(&mut self, seconds: f32) -> Result<()>;

    /// Enumerates the exportable nodes with their fixed decomposition kinds.
    fn nodes(&self) -> Vec<NodeDesc>;

    /// The node's authored local transform at the current cursor time.
    fn local_matrix(&self, node: NodeId) -> Mat4;

    /// The node's bind-pose local transform, independent of the cursor.
    fn rest_matrix(&self, node: NodeId) -> Mat4;

    /// Inherited-scale cancellation applied to a `ComplexJoint` node's
    /// secondary output, at the current cursor time. The authored local
    /// matrix does not contain this; only the host knows it.
    fn scale_compensation(&self, _node: NodeId) -> Vec3 {
        Vec3::ONE
    }

    /// Pivot offset carried by a `ComplexTransform` node's primary output,
    /// at the current cursor time.
    fn pivot_translation(&self, _node: NodeId) -> Vec3 {
        Vec3::ZERO
    }

    /// The node's blend-shape weights at the current cursor time. Length
    /// must equal the declared morph-target count.
    fn morph_weights(&self, node: NodeId) -> Vec<f32>;

    /// The node's rest-pose blend-shape weights.
    fn rest_morph_weights(&self, node: NodeId) -> Vec<f32>;
}
