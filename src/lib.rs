#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod baker;
pub mod channel;
pub mod clip;
pub mod config;
pub mod errors;
pub mod frames;
pub mod sampler;
pub mod scene;
pub mod transform;

pub use baker::{ClipBaker, ClipSpec};
pub use channel::{ChannelBuffer, Finalized};
pub use clip::{AnimationClip, Channel, ChannelProperty, ChannelTarget, NodeRole};
pub use config::BakeConfig;
pub use errors::{BakeError, Result};
pub use frames::FrameGrid;
pub use sampler::{NodeAnimationSampler, ShearReport};
pub use scene::{AnimSource, NodeDesc, NodeId, TransformKind};
pub use transform::{TransformCache, TransformState, Trs};
