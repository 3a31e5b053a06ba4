//! Numeric helpers used by the bundled backend.

pub mod stats;

pub use stats::{quantile_normal, root_mean_square};
