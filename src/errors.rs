//! Error Types
//!
//! This module defines the error types used throughout the crate.
//!
//! # Overview
//!
//! The main error type [`BakeError`] covers all failure modes including:
//! - Clip configuration errors (rejected before any sampling starts)
//! - Host scene evaluation failures
//!
//! Representational limitations (sheared transforms) are not errors: they are
//! recorded with bounded memory and reported as warnings after sampling.
//! Internal invariant breaches (mismatched buffer dimensions, finalizing a
//! partially sampled buffer) are assertion failures, not recoverable errors.
//!
//! # Usage
//!
//! All public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, BakeError>`.

use thiserror::Error;

/// The main error type for the clip baking pipeline.
#[derive(Error, Debug)]
pub enum BakeError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A clip must contain at least one frame.
    #[error("Invalid frame count: {0} (a clip must contain at least 1 frame)")]
    InvalidFrameCount(usize),

    /// The sample rate must be a positive, finite number of frames per second.
    #[error("Invalid sample rate: {0} frames per second (must be positive and finite)")]
    InvalidSampleRate(f32),

    // ========================================================================
    // Host Scene Errors
    // ========================================================================
    /// The host scene failed to evaluate at the requested time.
    #[error("Scene evaluation error: {0}")]
    Scene(String),
}

/// Alias for `Result<T, BakeError>`.
pub type Result<T> = std::result::Result<T, BakeError>;
