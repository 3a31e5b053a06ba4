//! Predictor that reshapes a tabular backend's output into quantile forecasts.
//!
//! The wrapped [`TabularModel`] answers the whole dataset with one flat
//! [`PredictionTable`]: `prediction_length` contiguous rows per series, one
//! column per output field. Each block of rows becomes one
//! [`QuantileForecast`] with its arrays transposed to `(field, step)`.
//!
//! # Persistence
//!
//! [`QuantilePredictor::serialize`] asks the model to save itself and writes
//! [`METADATA_FILE`](super::METADATA_FILE) into the destination directory.
//! The model saves to its own configured location, not to the destination
//! directory; callers that want a self-contained directory must configure the
//! model path to match.

use super::metadata::PredictorMetadata;
use super::traits::{PredictOptions, Predictor};
use crate::core::{Dataset, Frequency, PredictionTable, QuantileForecast, TimeSeriesFrame};
use crate::error::{AdapterError, Result};
use crate::models::TabularModel;
use std::path::Path;
use tracing::{debug, info};

/// Adapter exposing a [`TabularModel`] through the [`Predictor`] interface.
#[derive(Debug, Clone)]
pub struct QuantilePredictor<M> {
    model: M,
    prediction_length: usize,
    freq: Frequency,
    lead_time: usize,
}

/// Builder for [`QuantilePredictor`].
#[derive(Debug, Clone)]
pub struct QuantilePredictorBuilder<M> {
    model: M,
    prediction_length: Option<usize>,
    freq: Option<String>,
    lead_time: usize,
}

impl<M: TabularModel> QuantilePredictorBuilder<M> {
    pub fn prediction_length(mut self, prediction_length: usize) -> Self {
        self.prediction_length = Some(prediction_length);
        self
    }

    pub fn freq(mut self, freq: impl Into<String>) -> Self {
        self.freq = Some(freq.into());
        self
    }

    pub fn lead_time(mut self, lead_time: usize) -> Self {
        self.lead_time = lead_time;
        self
    }

    pub fn build(self) -> Result<QuantilePredictor<M>> {
        let prediction_length = self.prediction_length.ok_or_else(|| {
            AdapterError::InvalidParameter("prediction_length is required".to_string())
        })?;
        let freq = self
            .freq
            .ok_or_else(|| AdapterError::InvalidParameter("freq is required".to_string()))?;
        Ok(QuantilePredictor::new(self.model, prediction_length, &freq)?
            .with_lead_time(self.lead_time))
    }
}

impl<M: TabularModel> QuantilePredictor<M> {
    /// Wrap a trained model.
    ///
    /// Fails when the backend is unavailable in this build, when
    /// `prediction_length` is zero, or when `freq` is empty. Tokens without a
    /// known step are kept as given; [`predict`](Self::predict) reports them
    /// when it has to generate timestamps.
    pub fn new(model: M, prediction_length: usize, freq: &str) -> Result<Self> {
        M::check_available()?;
        if prediction_length == 0 {
            return Err(AdapterError::InvalidParameter(
                "prediction_length must be positive".to_string(),
            ));
        }

        Ok(Self {
            model,
            prediction_length,
            freq: Frequency::from_token(freq)?,
            lead_time: 0,
        })
    }

    pub fn builder(model: M) -> QuantilePredictorBuilder<M> {
        QuantilePredictorBuilder {
            model,
            prediction_length: None,
            freq: None,
            lead_time: 0,
        }
    }

    /// Set the lead time. Stored and reported, not used for reshaping.
    pub fn with_lead_time(mut self, lead_time: usize) -> Self {
        self.lead_time = lead_time;
        self
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    pub fn frequency(&self) -> &Frequency {
        &self.freq
    }

    /// Forecast every series of `dataset`.
    ///
    /// The model is called once for the whole dataset. The returned iterator
    /// yields one record per `prediction_length` rows of its output, in table
    /// order.
    ///
    /// # Panics
    ///
    /// Panics before yielding anything if the model's row count is not a
    /// multiple of `prediction_length`. That means the model and predictor
    /// disagree on the horizon.
    pub fn predict(&self, dataset: &Dataset, options: &PredictOptions) -> Result<Forecasts> {
        debug!(
            backend = M::NAME,
            series = dataset.len(),
            num_samples = ?options.num_samples,
            num_workers = ?options.num_workers,
            num_prefetch = ?options.num_prefetch,
            "predicting"
        );

        let frame = TimeSeriesFrame::from_dataset(dataset, &self.freq)?;
        let table = self.model.predict(&frame)?;
        debug!(
            rows = table.num_rows(),
            columns = table.num_columns(),
            "model output"
        );

        Ok(Forecasts::new(
            table,
            self.prediction_length,
            self.freq.token().to_string(),
        ))
    }

    /// Save the model and write the predictor metadata into `path`.
    pub fn serialize(&self, path: &Path) -> Result<()> {
        self.model.save()?;
        let file = PredictorMetadata::new(self.freq.token(), self.prediction_length)
            .write_to(path)?;
        info!(backend = M::NAME, path = %file.display(), "predictor serialized");
        Ok(())
    }

    /// Load the model from `path` and restore the predictor settings.
    pub fn deserialize(path: &Path) -> Result<Self> {
        let model = M::load(path)?;
        let meta = PredictorMetadata::read_from(path)?;
        info!(
            backend = M::NAME,
            path = %path.display(),
            freq = %meta.freq,
            prediction_length = meta.prediction_length,
            "predictor deserialized"
        );
        Self::new(model, meta.prediction_length, &meta.freq)
    }
}

impl<M: TabularModel> Predictor for QuantilePredictor<M> {
    fn prediction_length(&self) -> usize {
        self.prediction_length
    }

    fn freq(&self) -> &str {
        self.freq.token()
    }

    fn lead_time(&self) -> usize {
        self.lead_time
    }

    fn predict(
        &self,
        dataset: &Dataset,
        options: &PredictOptions,
    ) -> Result<Box<dyn Iterator<Item = QuantileForecast>>> {
        Ok(Box::new(QuantilePredictor::predict(self, dataset, options)?))
    }

    fn serialize(&self, path: &Path) -> Result<()> {
        QuantilePredictor::serialize(self, path)
    }

    fn deserialize(path: &Path) -> Result<Self> {
        QuantilePredictor::deserialize(path)
    }
}

/// Single-pass iterator over the per-series forecasts of one prediction table.
#[derive(Debug)]
pub struct Forecasts {
    table: PredictionTable,
    prediction_length: usize,
    freq: String,
    next: usize,
    count: usize,
}

impl Forecasts {
    /// Panics if the table's rows do not split into whole blocks.
    pub fn new(table: PredictionTable, prediction_length: usize, freq: String) -> Self {
        assert!(prediction_length > 0, "prediction_length must be positive");
        let rows = table.num_rows();
        assert!(
            rows % prediction_length == 0,
            "prediction table has {rows} rows, not a multiple of prediction_length {prediction_length}"
        );

        Self {
            count: rows / prediction_length,
            table,
            prediction_length,
            freq,
            next: 0,
        }
    }

    /// Underlying prediction table.
    pub fn table(&self) -> &PredictionTable {
        &self.table
    }
}

impl Iterator for Forecasts {
    type Item = QuantileForecast;

    fn next(&mut self) -> Option<QuantileForecast> {
        if self.next >= self.count {
            return None;
        }
        let begin = self.next * self.prediction_length;
        let end = begin + self.prediction_length;
        self.next += 1;

        let (item_id, start_date) = self.table.index()[begin].clone();
        Some(QuantileForecast::from_parts(
            self.table.block_transposed(begin..end),
            start_date,
            self.freq.clone(),
            self.table.columns().to_vec(),
            item_id,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Forecasts {}

impl std::iter::FusedIterator for Forecasts {}
