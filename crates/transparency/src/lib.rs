//! Transparency sorting: painter's-algorithm ordering for alpha-blended
//! billboards.
//!
//! # Invariants
//! - Sorting only permutes; no object is duplicated or dropped.
//! - After a sort, distances are non-increasing (farthest first).
//! - Order among exactly equal distances is unspecified.

mod sorter;

pub use alchemy_common::DistanceMetric;
pub use sorter::{
    TransparentObject, TransparentSet, refresh_distances, refresh_distances_with,
    sort_back_to_front,
};
