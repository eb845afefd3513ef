//! The per-clip bake driver.
//!
//! One bake owns the scene's time cursor for its whole duration: frames are
//! sampled strictly in increasing time order, each against a fresh
//! [`TransformCache`], and only after the last frame do the samplers drain
//! into the output clip.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::clip::AnimationClip;
use crate::config::BakeConfig;
use crate::errors::Result;
use crate::frames::FrameGrid;
use crate::sampler::NodeAnimationSampler;
use crate::scene::AnimSource;
use crate::transform::TransformCache;

/// Description of one clip to bake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipSpec {
    pub name: String,
    /// Absolute scene time of the first frame, in seconds.
    pub start_time: f32,
    pub frame_count: usize,
    pub frames_per_second: f32,
}

/// Bakes clips from a live scene under one configuration.
pub struct ClipBaker<'a> {
    config: &'a BakeConfig,
}

impl<'a> ClipBaker<'a> {
    #[must_use]
    pub fn new(config: &'a BakeConfig) -> Self {
        Self { config }
    }

    /// Bakes one clip, logging progress at info level.
    pub fn bake<S: AnimSource>(&self, clip: &ClipSpec, scene: &mut S) -> Result<AnimationClip> {
        self.bake_with_progress(clip, scene, |message| log::info!("{message}"))
    }

    /// Bakes one clip, reporting textual progress through `on_progress` at a
    /// bounded frame interval. Progress is best effort and non-critical to
    /// correctness.
    pub fn bake_with_progress<S: AnimSource>(
        &self,
        clip: &ClipSpec,
        scene: &mut S,
        mut on_progress: impl FnMut(&str),
    ) -> Result<AnimationClip> {
        let grid = Arc::new(FrameGrid::build(clip.frame_count, clip.frames_per_second)?);

        let mut samplers: Vec<NodeAnimationSampler> = scene
            .nodes()
            .into_iter()
            .filter(|node| node.animated)
            .map(|node| NodeAnimationSampler::new(scene, node, &grid, self.config))
            .collect();

        let interval = self.config.progress_frame_interval.max(1);

        for (frame_index, &relative) in grid.times().iter().enumerate() {
            let absolute = clip.start_time + relative;
            scene.advance_to(absolute)?;

            let mut cache = TransformCache::new();
            for sampler in &mut samplers {
                sampler.sample_at(scene, absolute, frame_index, &mut cache, self.config);
            }

            if frame_index % interval == interval - 1 {
                let percent = frame_index * 100 / grid.count();
                on_progress(&format!("baking clip '{}': {percent}%", clip.name));
            }
        }

        let mut animation = AnimationClip::new(clip.name.clone());
        for sampler in samplers {
            sampler.export_to(scene, &mut animation, self.config);
        }

        Ok(animation)
    }
}
