//! Stateless feature extraction over a normalized single-band plane.

pub mod circle;
pub mod pattern;

pub use self::circle::{interpolate, CircleSampler};
pub use self::pattern::{lbp_riu2, local_variance};
