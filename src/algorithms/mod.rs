//! Geodesic algorithms

pub mod distance;

pub use distance::{distance_m, within_radius};
