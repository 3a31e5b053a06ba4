//! # tsbench-quantile
//!
//! Predictor adapter for tabular time-series forecasting backends.
//!
//! A backend implementing [`models::TabularModel`] answers a whole dataset
//! with one flat prediction table. [`predictor::QuantilePredictor`] reshapes
//! that table into one [`core::QuantileForecast`] per input series, and
//! persists its frequency and horizon next to the backend's own artifacts.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use tsbench_quantile::prelude::*;
//!
//! let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let dataset = Dataset::from(vec![
//!     DataEntry::new("a", start, vec![1.0, 2.0, 3.0]),
//!     DataEntry::new("b", start, vec![5.0, 4.0, 6.0]),
//! ]);
//!
//! let model = BaselineQuantileModel::builder()
//!     .prediction_length(4)
//!     .freq("D")
//!     .build()
//!     .unwrap();
//! let predictor = QuantilePredictor::new(model, 4, "D").unwrap();
//!
//! let forecasts: Vec<_> = predictor
//!     .predict(&dataset, &PredictOptions::default())
//!     .unwrap()
//!     .collect();
//! assert_eq!(forecasts.len(), 2);
//! assert_eq!(forecasts[0].shape(), (10, 4));
//! ```

pub mod core;
pub mod error;
pub mod models;
pub mod predictor;
pub mod utils;

pub use error::{AdapterError, Result};

pub mod prelude {
    pub use crate::core::{DataEntry, Dataset, Frequency, PredictionTable, QuantileForecast};
    pub use crate::error::{AdapterError, Result};
    pub use crate::models::{BaselineQuantileModel, TabularModel};
    pub use crate::predictor::{PredictOptions, Predictor, QuantilePredictor};
}
