//! Free-fly camera model.
//!
//! # Invariants
//! - `front`, `right`, `up` are orthonormal and consistent with yaw/pitch.
//! - Zoom stays within [`MIN_ZOOM`, `MAX_ZOOM`] degrees.
//! - Pitch stays within ±[`PITCH_LIMIT`] degrees when constrained.
//! - No operation fails: out-of-range input is clamped or ignored.

mod camera;

pub use camera::{Camera, CameraMovement, MAX_ZOOM, MIN_ZOOM, PITCH_LIMIT};
