//! Predictor trait defining the interface evaluation and serving code consume.

use crate::core::{Dataset, QuantileForecast};
use crate::error::Result;
use std::path::Path;

/// Optional inference hints.
///
/// Accepted for interface compatibility. Backends decide their own sampling
/// and parallelism, so these do not change the forecasts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictOptions {
    pub num_samples: Option<usize>,
    pub num_workers: Option<usize>,
    pub num_prefetch: Option<usize>,
}

impl PredictOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_samples(mut self, n: usize) -> Self {
        self.num_samples = Some(n);
        self
    }

    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = Some(n);
        self
    }

    pub fn num_prefetch(mut self, n: usize) -> Self {
        self.num_prefetch = Some(n);
        self
    }
}

/// Common interface for all predictors.
///
/// Object-safe apart from [`Predictor::deserialize`], so predictors can be
/// handled as [`BoxedPredictor`].
pub trait Predictor {
    /// Number of steps every forecast covers.
    fn prediction_length(&self) -> usize;

    /// Frequency token of the forecasts.
    fn freq(&self) -> &str;

    /// Gap between the end of the input and the first forecast step.
    fn lead_time(&self) -> usize {
        0
    }

    /// Forecast every series of `dataset`, one record per series.
    fn predict(
        &self,
        dataset: &Dataset,
        options: &PredictOptions,
    ) -> Result<Box<dyn Iterator<Item = QuantileForecast>>>;

    /// Persist the predictor into `path`.
    fn serialize(&self, path: &Path) -> Result<()>;

    /// Restore a predictor from `path`.
    fn deserialize(path: &Path) -> Result<Self>
    where
        Self: Sized;
}

/// Type alias for boxed predictor trait objects.
pub type BoxedPredictor = Box<dyn Predictor>;
