//! FrameGrid Tests
//!
//! Tests for:
//! - Sample-time count, spacing and ordering
//! - Fail-fast validation of frame count and sample rate

use kiln::{BakeError, FrameGrid};

const EPSILON: f32 = 1e-6;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

#[test]
fn grid_times_start_at_zero_and_are_evenly_spaced() {
    let grid = FrameGrid::build(24, 24.0).unwrap();

    assert_eq!(grid.count(), 24);
    assert_eq!(grid.times().len(), 24);
    assert!(approx_eq(grid.times()[0], 0.0));

    for (i, &t) in grid.times().iter().enumerate() {
        assert!(
            approx_eq(t, i as f32 / 24.0),
            "frame {i}: expected {}, got {t}",
            i as f32 / 24.0
        );
    }
}

#[test]
fn grid_times_strictly_increasing() {
    for &(count, rate) in &[(1_usize, 30.0_f32), (2, 24.0), (120, 60.0), (500, 12.5)] {
        let grid = FrameGrid::build(count, rate).unwrap();
        assert_eq!(grid.count(), count, "rate {rate}");
        for pair in grid.times().windows(2) {
            assert!(pair[0] < pair[1], "times must strictly increase");
        }
    }
}

#[test]
fn grid_single_frame() {
    let grid = FrameGrid::build(1, 30.0).unwrap();
    assert_eq!(grid.count(), 1);
    assert!(approx_eq(grid.times()[0], 0.0));
    assert!(approx_eq(grid.sample_rate(), 30.0));
}

#[test]
fn grid_rejects_zero_frames() {
    // A zero-duration clip is a configuration error, caught before any
    // sampling occurs.
    let err = FrameGrid::build(0, 24.0).unwrap_err();
    assert!(matches!(err, BakeError::InvalidFrameCount(0)), "got {err}");
}

#[test]
fn grid_rejects_non_positive_rate() {
    assert!(matches!(
        FrameGrid::build(10, 0.0).unwrap_err(),
        BakeError::InvalidSampleRate(_)
    ));
    assert!(matches!(
        FrameGrid::build(10, -24.0).unwrap_err(),
        BakeError::InvalidSampleRate(_)
    ));
}

#[test]
fn grid_rejects_non_finite_rate() {
    assert!(matches!(
        FrameGrid::build(10, f32::NAN).unwrap_err(),
        BakeError::InvalidSampleRate(_)
    ));
    assert!(matches!(
        FrameGrid::build(10, f32::INFINITY).unwrap_err(),
        BakeError::InvalidSampleRate(_)
    ));
}
