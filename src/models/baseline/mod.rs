//! Reference backend bundled with the crate.
//!
//! Useful as a benchmark floor and for exercising predictors without an
//! external forecasting library.

mod naive;

pub use naive::{default_quantile_levels, BaselineQuantileModel, BaselineQuantileModelBuilder, MODEL_FILE};
