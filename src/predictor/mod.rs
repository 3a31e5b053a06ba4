//! Predictors exposed to evaluation and serving code.

mod metadata;
mod quantile;
mod traits;

pub use metadata::{PredictorMetadata, METADATA_FILE};
pub use quantile::{Forecasts, QuantilePredictor, QuantilePredictorBuilder};
pub use traits::{BoxedPredictor, PredictOptions, Predictor};
