//! Quantile forecast record produced per input series.

use crate::core::Frequency;
use crate::error::{AdapterError, Result};
use chrono::{DateTime, Utc};

/// Forecast of a single series, one row per output field.
///
/// `forecast_arrays[field][step]` holds the value of `forecast_keys[field]`
/// at horizon step `step`. Keys are typically `"mean"` and quantile levels
/// such as `"0.1"` or `"0.9"`.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileForecast {
    forecast_arrays: Vec<Vec<f64>>,
    start_date: DateTime<Utc>,
    freq: String,
    forecast_keys: Vec<String>,
    item_id: Option<String>,
}

impl QuantileForecast {
    /// Create a forecast record.
    ///
    /// Fails when the number of arrays differs from the number of keys or the
    /// arrays have different lengths.
    pub fn new(
        forecast_arrays: Vec<Vec<f64>>,
        start_date: DateTime<Utc>,
        freq: impl Into<String>,
        forecast_keys: Vec<String>,
        item_id: Option<String>,
    ) -> Result<Self> {
        if forecast_arrays.len() != forecast_keys.len() {
            return Err(AdapterError::DimensionMismatch {
                expected: forecast_keys.len(),
                got: forecast_arrays.len(),
            });
        }
        let horizon = forecast_arrays.first().map(|a| a.len()).unwrap_or(0);
        if let Some(bad) = forecast_arrays.iter().find(|a| a.len() != horizon) {
            return Err(AdapterError::DimensionMismatch {
                expected: horizon,
                got: bad.len(),
            });
        }

        Ok(Self {
            forecast_arrays,
            start_date,
            freq: freq.into(),
            forecast_keys,
            item_id,
        })
    }

    /// Assemble a record whose shape the caller already guarantees.
    pub(crate) fn from_parts(
        forecast_arrays: Vec<Vec<f64>>,
        start_date: DateTime<Utc>,
        freq: String,
        forecast_keys: Vec<String>,
        item_id: String,
    ) -> Self {
        debug_assert_eq!(forecast_arrays.len(), forecast_keys.len());
        Self {
            forecast_arrays,
            start_date,
            freq,
            forecast_keys,
            item_id: Some(item_id),
        }
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    /// Timestamp of the first forecasted step.
    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn freq(&self) -> &str {
        &self.freq
    }

    pub fn forecast_keys(&self) -> &[String] {
        &self.forecast_keys
    }

    /// All arrays, shaped `(fields, horizon)`.
    pub fn forecast_arrays(&self) -> &[Vec<f64>] {
        &self.forecast_arrays
    }

    /// `(fields, horizon)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.forecast_arrays.len(), self.prediction_length())
    }

    pub fn prediction_length(&self) -> usize {
        self.forecast_arrays.first().map(|a| a.len()).unwrap_or(0)
    }

    /// Array stored under an exact key.
    pub fn field(&self, key: &str) -> Result<&[f64]> {
        self.forecast_keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.forecast_arrays[i].as_slice())
            .ok_or_else(|| AdapterError::UnknownForecastKey(key.to_string()))
    }

    /// Array for quantile level `q`, matched numerically against the keys.
    pub fn quantile(&self, q: f64) -> Result<&[f64]> {
        self.forecast_keys
            .iter()
            .position(|k| {
                k.parse::<f64>()
                    .map(|level| (level - q).abs() < 1e-9)
                    .unwrap_or(false)
            })
            .map(|i| self.forecast_arrays[i].as_slice())
            .ok_or_else(|| AdapterError::UnknownForecastKey(q.to_string()))
    }

    /// The `"mean"` array, falling back to the median.
    pub fn mean(&self) -> Result<&[f64]> {
        self.field("mean").or_else(|_| self.quantile(0.5))
    }

    /// Timestamps of every forecasted step.
    pub fn index(&self) -> Result<Vec<DateTime<Utc>>> {
        Frequency::parse(&self.freq)?.range(self.start_date, self.prediction_length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn forecast_reports_shape_and_metadata() {
        let forecast = QuantileForecast::new(
            vec![vec![1.0, 2.0], vec![0.5, 1.5], vec![1.5, 2.5]],
            start(),
            "D",
            keys(&["mean", "0.1", "0.9"]),
            Some("store_1".to_string()),
        )
        .unwrap();

        assert_eq!(forecast.shape(), (3, 2));
        assert_eq!(forecast.prediction_length(), 2);
        assert_eq!(forecast.item_id(), Some("store_1"));
        assert_eq!(forecast.freq(), "D");
        assert_eq!(forecast.start_date(), start());
    }

    #[test]
    fn forecast_rejects_ragged_arrays() {
        let result = QuantileForecast::new(
            vec![vec![1.0, 2.0], vec![1.0]],
            start(),
            "D",
            keys(&["0.1", "0.9"]),
            None,
        );
        assert!(matches!(
            result,
            Err(AdapterError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));

        let result = QuantileForecast::new(vec![vec![1.0]], start(), "D", keys(&[]), None);
        assert!(result.is_err());
    }

    #[test]
    fn quantile_lookup_matches_numeric_keys() {
        let forecast = QuantileForecast::new(
            vec![vec![1.0], vec![2.0], vec![3.0]],
            start(),
            "H",
            keys(&["0.1", "0.50", "0.9"]),
            None,
        )
        .unwrap();

        assert_eq!(forecast.quantile(0.1).unwrap(), &[1.0]);
        assert_eq!(forecast.quantile(0.5).unwrap(), &[2.0]);
        assert!(matches!(
            forecast.quantile(0.25),
            Err(AdapterError::UnknownForecastKey(_))
        ));
    }

    #[test]
    fn mean_prefers_mean_key_then_median() {
        let with_mean = QuantileForecast::new(
            vec![vec![7.0], vec![5.0]],
            start(),
            "D",
            keys(&["0.5", "mean"]),
            None,
        )
        .unwrap();
        assert_eq!(with_mean.mean().unwrap(), &[5.0]);

        let median_only =
            QuantileForecast::new(vec![vec![7.0]], start(), "D", keys(&["0.5"]), None).unwrap();
        assert_eq!(median_only.mean().unwrap(), &[7.0]);

        let neither =
            QuantileForecast::new(vec![vec![7.0]], start(), "D", keys(&["0.9"]), None).unwrap();
        assert!(neither.mean().is_err());
    }

    #[test]
    fn index_follows_frequency() {
        let forecast = QuantileForecast::new(
            vec![vec![0.0, 0.0, 0.0]],
            start(),
            "6H",
            keys(&["mean"]),
            None,
        )
        .unwrap();

        let index = forecast.index().unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index[0], start());
        assert_eq!(index[2], start() + Duration::hours(12));
    }

    #[test]
    fn index_fails_for_unknown_frequency() {
        let forecast =
            QuantileForecast::new(vec![vec![0.0]], start(), "fortnight", keys(&["mean"]), None)
                .unwrap();
        assert!(matches!(
            forecast.index(),
            Err(AdapterError::InvalidFrequency(t)) if t == "fortnight"
        ));
    }
}
