//! Transform decomposition and the per-frame cache.
//!
//! A node's authored local matrix is decomposed once per frame into one or
//! two TRS triples depending on its [`TransformKind`], together with a shear
//! measure. Whatever shear the matrix carries beyond a TRS is not
//! representable in the output format; it is measured here and reported by
//! the sampler, never resolved (a true skew-preserving factorization would
//! need an SVD and is out of scope).

use glam::{Mat3, Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::scene::{AnimSource, NodeDesc, NodeId, TransformKind};

/// Translation/rotation/scale triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trs {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Trs {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// The decomposed local transform of one node at one frame.
///
/// Never mutated after creation; cached per node inside a [`TransformCache`]
/// that lives for exactly one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformState {
    pub primary: Trs,
    pub secondary: Trs,
    /// 0 = perfectly decomposable; larger values measure shear that the TRS
    /// split cannot represent, relative to the dominant scale magnitude.
    pub max_non_orthogonality: f32,
}

impl TransformState {
    /// Decomposes an authored local matrix into the primary/secondary TRS
    /// pair for the given kind.
    ///
    /// `compensation` and `pivot` are the host-reported split components for
    /// the complex kinds (identity for `Simple` nodes and for hosts that do
    /// not use them). `scale_factor` uniformly rescales translations.
    #[must_use]
    pub fn decompose(
        matrix: Mat4,
        kind: TransformKind,
        compensation: Vec3,
        pivot: Vec3,
        scale_factor: f32,
    ) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        let max_non_orthogonality = non_orthogonality(&matrix, rotation, scale);
        let translation = translation * scale_factor;

        let (primary, secondary) = match kind {
            TransformKind::Simple => (
                Trs {
                    translation,
                    rotation,
                    scale,
                },
                Trs::IDENTITY,
            ),
            TransformKind::ComplexJoint => (
                Trs {
                    translation: Vec3::ZERO,
                    rotation,
                    scale,
                },
                Trs {
                    translation,
                    rotation: Quat::IDENTITY,
                    scale: compensation,
                },
            ),
            TransformKind::ComplexTransform => {
                let pivot = pivot * scale_factor;
                (
                    Trs {
                        translation: pivot,
                        rotation: Quat::IDENTITY,
                        scale: Vec3::ONE,
                    },
                    Trs {
                        translation: translation - pivot,
                        rotation,
                        scale,
                    },
                )
            }
        };

        Self {
            primary,
            secondary,
            max_non_orthogonality,
        }
    }

    /// Recombines the primary/secondary pair into the local matrix the
    /// runtime will reconstruct.
    ///
    /// For a shear-free matrix sampled with identity compensation this
    /// reproduces the authored local matrix. The `ComplexJoint` corrective
    /// scale recombines against inherited scale one level up the output
    /// hierarchy, so it does not participate here.
    #[must_use]
    pub fn recompose(&self, kind: TransformKind) -> Mat4 {
        match kind {
            TransformKind::Simple => self.primary.matrix(),
            TransformKind::ComplexJoint => {
                Mat4::from_translation(self.secondary.translation)
                    * Mat4::from_quat(self.primary.rotation)
                    * Mat4::from_scale(self.primary.scale)
            }
            TransformKind::ComplexTransform => {
                Mat4::from_translation(self.primary.translation) * self.secondary.matrix()
            }
        }
    }
}

/// Largest deviation between the reconstructed rotation-scale block and the
/// authored 3x3 block, relative to the dominant scale magnitude.
fn non_orthogonality(matrix: &Mat4, rotation: Quat, scale: Vec3) -> f32 {
    let authored = Mat3::from_mat4(*matrix);
    let rebuilt = Mat3::from_quat(rotation) * Mat3::from_diagonal(scale);

    let mut max_deviation: f32 = 0.0;
    for col in 0..3 {
        let diff = (rebuilt.col(col) - authored.col(col)).abs();
        max_deviation = max_deviation.max(diff.max_element());
    }

    max_deviation / scale.abs().max_element().max(f32::EPSILON)
}

/// Per-frame memoization of decomposed transforms.
///
/// Constructed fresh for every frame so stale decompositions never leak
/// forward; within the frame each node is decomposed at most once and shared
/// across all consumers.
#[derive(Debug, Default)]
pub struct TransformCache {
    entries: FxHashMap<NodeId, TransformState>,
}

impl TransformCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Returns the node's decomposed transform at the scene's current cursor
    /// time, computing and memoizing it on first access within the frame.
    pub fn get<S: AnimSource>(
        &mut self,
        scene: &S,
        node: &NodeDesc,
        scale_factor: f32,
    ) -> &TransformState {
        self.entries.entry(node.id).or_insert_with(|| {
            TransformState::decompose(
                scene.local_matrix(node.id),
                node.kind,
                scene.scale_compensation(node.id),
                scene.pivot_translation(node.id),
                scale_factor,
            )
        })
    }
}
