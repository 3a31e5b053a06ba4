//! Naive quantile backend.
//!
//! Forecasts the last observed value as the mean of every future step and
//! spreads normal quantiles around it. The spread is the root mean square of
//! the series' first differences, widened with `sqrt(h)` along the horizon.

use crate::core::{Frequency, PredictionTable, TimeSeriesFrame};
use crate::error::{AdapterError, Result};
use crate::models::TabularModel;
use crate::utils::{quantile_normal, root_mean_square};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File the backend writes inside its own model directory.
pub const MODEL_FILE: &str = "model.json";

/// Persisted configuration of a [`BaselineQuantileModel`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct BaselineConfig {
    prediction_length: usize,
    freq: String,
    quantile_levels: Vec<f64>,
}

/// Naive forecaster answering whole frames with `"mean"` plus quantile columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineQuantileModel {
    prediction_length: usize,
    freq: Frequency,
    quantile_levels: Vec<f64>,
    path: PathBuf,
}

/// Builder for [`BaselineQuantileModel`].
#[derive(Debug, Clone)]
pub struct BaselineQuantileModelBuilder {
    prediction_length: usize,
    freq: String,
    quantile_levels: Vec<f64>,
    path: PathBuf,
}

impl Default for BaselineQuantileModelBuilder {
    fn default() -> Self {
        Self {
            prediction_length: 1,
            freq: "D".to_string(),
            quantile_levels: default_quantile_levels(),
            path: PathBuf::from("baseline-model"),
        }
    }
}

/// Deciles `0.1..=0.9`.
pub fn default_quantile_levels() -> Vec<f64> {
    (1..=9).map(|i| i as f64 / 10.0).collect()
}

impl BaselineQuantileModelBuilder {
    pub fn prediction_length(mut self, prediction_length: usize) -> Self {
        self.prediction_length = prediction_length;
        self
    }

    pub fn freq(mut self, freq: impl Into<String>) -> Self {
        self.freq = freq.into();
        self
    }

    pub fn quantile_levels(mut self, levels: Vec<f64>) -> Self {
        self.quantile_levels = levels;
        self
    }

    /// Directory the model saves itself to.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn build(self) -> Result<BaselineQuantileModel> {
        BaselineQuantileModel::from_config(
            BaselineConfig {
                prediction_length: self.prediction_length,
                freq: self.freq,
                quantile_levels: self.quantile_levels,
            },
            self.path,
        )
    }
}

impl BaselineQuantileModel {
    pub fn builder() -> BaselineQuantileModelBuilder {
        BaselineQuantileModelBuilder::default()
    }

    fn from_config(config: BaselineConfig, path: PathBuf) -> Result<Self> {
        if config.prediction_length == 0 {
            return Err(AdapterError::InvalidParameter(
                "prediction_length must be positive".to_string(),
            ));
        }
        if let Some(bad) = config
            .quantile_levels
            .iter()
            .find(|q| !(**q > 0.0 && **q < 1.0))
        {
            return Err(AdapterError::InvalidParameter(format!(
                "quantile level {bad} must lie strictly between 0 and 1"
            )));
        }

        Ok(Self {
            prediction_length: config.prediction_length,
            freq: Frequency::parse(&config.freq)?,
            quantile_levels: config.quantile_levels,
            path,
        })
    }

    fn config(&self) -> BaselineConfig {
        BaselineConfig {
            prediction_length: self.prediction_length,
            freq: self.freq.token().to_string(),
            quantile_levels: self.quantile_levels.clone(),
        }
    }

    pub fn prediction_length(&self) -> usize {
        self.prediction_length
    }

    pub fn freq(&self) -> &Frequency {
        &self.freq
    }

    pub fn quantile_levels(&self) -> &[f64] {
        &self.quantile_levels
    }

    /// Directory the model saves itself to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Output columns: `"mean"` followed by one column per quantile level.
    pub fn columns(&self) -> Vec<String> {
        std::iter::once("mean".to_string())
            .chain(self.quantile_levels.iter().map(|q| q.to_string()))
            .collect()
    }
}

impl TabularModel for BaselineQuantileModel {
    const NAME: &'static str = "baseline";

    fn check_available() -> Result<()> {
        if cfg!(feature = "baseline") {
            Ok(())
        } else {
            Err(AdapterError::BackendUnavailable {
                backend: Self::NAME,
                hint: "rebuild tsbench-quantile with the `baseline` feature enabled",
            })
        }
    }

    fn predict(&self, frame: &TimeSeriesFrame) -> Result<PredictionTable> {
        let mut table = PredictionTable::with_columns(self.columns());
        let z: Vec<f64> = self.quantile_levels.iter().map(|q| quantile_normal(*q)).collect();
        let mut row = vec![0.0; 1 + z.len()];

        for series in frame.iter_series() {
            let observed: Vec<f64> = series
                .target
                .iter()
                .copied()
                .filter(|v| v.is_finite())
                .collect();
            let last = *observed.last().ok_or_else(|| {
                AdapterError::Model(format!(
                    "series '{}' has no finite observations",
                    series.item_id
                ))
            })?;

            let diffs: Vec<f64> = observed.windows(2).map(|w| w[1] - w[0]).collect();
            let sigma = root_mean_square(&diffs);
            debug!(item_id = series.item_id, last, sigma, "baseline fit");

            // The horizon starts one step after the final row, observed or not.
            let anchor = *series.timestamps.last().ok_or_else(|| {
                AdapterError::Model(format!("series '{}' is empty", series.item_id))
            })?;
            for h in 1..=self.prediction_length {
                let ts = self.freq.advance(anchor, h).ok_or_else(|| {
                    AdapterError::Model(format!(
                        "forecast timestamp for '{}' is out of range",
                        series.item_id
                    ))
                })?;
                let se = sigma * (h as f64).sqrt();
                row[0] = last;
                for (slot, zq) in row[1..].iter_mut().zip(&z) {
                    *slot = last + zq * se;
                }
                table.push_row(series.item_id, ts, &row)?;
            }
        }

        Ok(table)
    }

    fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.path).map_err(|e| AdapterError::io(&self.path, e))?;
        let file = self.path.join(MODEL_FILE);
        let json = serde_json::to_string_pretty(&self.config())
            .map_err(|e| AdapterError::metadata(&file, e))?;
        fs::write(&file, json).map_err(|e| AdapterError::io(&file, e))?;
        debug!(path = %file.display(), "baseline model saved");
        Ok(())
    }

    fn load(path: &Path) -> Result<Self> {
        let file = path.join(MODEL_FILE);
        let json = fs::read_to_string(&file).map_err(|e| AdapterError::io(&file, e))?;
        let config: BaselineConfig =
            serde_json::from_str(&json).map_err(|e| AdapterError::metadata(&file, e))?;
        Self::from_config(config, path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataEntry, Dataset};
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn frame(entries: Vec<DataEntry>) -> TimeSeriesFrame {
        TimeSeriesFrame::from_dataset(&Dataset::from(entries), &Frequency::parse("D").unwrap())
            .unwrap()
    }

    fn start() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn builder_validates_parameters() {
        assert!(BaselineQuantileModel::builder()
            .prediction_length(0)
            .build()
            .is_err());
        assert!(BaselineQuantileModel::builder()
            .quantile_levels(vec![0.5, 1.0])
            .build()
            .is_err());
        assert!(matches!(
            BaselineQuantileModel::builder().freq("weekly-ish").build(),
            Err(AdapterError::InvalidFrequency(_))
        ));
    }

    #[test]
    fn columns_lead_with_mean() {
        let model = BaselineQuantileModel::builder()
            .quantile_levels(vec![0.1, 0.5, 0.9])
            .build()
            .unwrap();
        assert_eq!(model.columns(), vec!["mean", "0.1", "0.5", "0.9"]);
        assert_eq!(BaselineQuantileModel::builder().build().unwrap().columns().len(), 10);
    }

    #[test]
    fn constant_series_has_degenerate_quantiles() {
        let model = BaselineQuantileModel::builder()
            .prediction_length(3)
            .quantile_levels(vec![0.1, 0.9])
            .build()
            .unwrap();
        let table = model
            .predict(&frame(vec![DataEntry::new("flat", start(), vec![4.0; 5])]))
            .unwrap();

        assert_eq!(table.num_rows(), 3);
        for r in 0..3 {
            assert_eq!(table.row(r).unwrap(), &[4.0, 4.0, 4.0]);
        }
        assert_eq!(table.index()[0].1, start() + Duration::days(5));
    }

    #[test]
    fn quantiles_widen_with_horizon() {
        let model = BaselineQuantileModel::builder()
            .prediction_length(4)
            .quantile_levels(vec![0.1, 0.5, 0.9])
            .build()
            .unwrap();
        let table = model
            .predict(&frame(vec![DataEntry::new(
                "walk",
                start(),
                vec![1.0, 2.0, 1.0, 2.0, 1.0],
            )]))
            .unwrap();

        let first = table.row(0).unwrap();
        let last = table.row(3).unwrap();
        assert_eq!(first[0], 1.0);
        assert_relative_eq!(first[2], 1.0, epsilon = 1e-3);
        assert!(first[1] < first[0] && first[3] > first[0]);
        assert!(last[3] - last[1] > first[3] - first[1]);
        assert_relative_eq!(
            (last[3] - last[0]) / (first[3] - first[0]),
            2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn trailing_missing_values_are_skipped() {
        let model = BaselineQuantileModel::builder()
            .prediction_length(1)
            .quantile_levels(vec![])
            .build()
            .unwrap();
        let table = model
            .predict(&frame(vec![DataEntry::new(
                "gappy",
                start(),
                vec![3.0, 5.0, f64::NAN],
            )]))
            .unwrap();
        assert_eq!(table.row(0).unwrap(), &[5.0]);
        assert_eq!(table.index()[0].1, start() + Duration::days(3));

        let err = model
            .predict(&frame(vec![DataEntry::new("void", start(), vec![f64::NAN])]))
            .unwrap_err();
        assert!(matches!(err, AdapterError::Model(_)));
    }

    #[test]
    fn save_then_load_restores_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let model = BaselineQuantileModel::builder()
            .prediction_length(7)
            .freq("H")
            .quantile_levels(vec![0.25, 0.75])
            .path(dir.path().join("autogen"))
            .build()
            .unwrap();

        model.save().unwrap();
        assert!(dir.path().join("autogen").join(MODEL_FILE).exists());

        let restored = BaselineQuantileModel::load(&dir.path().join("autogen")).unwrap();
        assert_eq!(restored, model);
    }

    #[test]
    fn load_reports_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BaselineQuantileModel::load(dir.path()).unwrap_err();
        assert!(matches!(err, AdapterError::Io { ref path, .. } if path.ends_with(MODEL_FILE)));
    }
}
