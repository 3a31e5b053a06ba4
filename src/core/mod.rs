//! Core data structures shared by predictors and backends.

mod dataset;
mod forecast;
mod frame;
mod frequency;

pub use dataset::{DataEntry, Dataset};
pub use forecast::QuantileForecast;
pub use frame::{FrameSeries, PredictionTable, TimeSeriesFrame};
pub use frequency::{Frequency, FrequencyUnit};
