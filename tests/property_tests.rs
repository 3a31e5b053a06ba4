//! Property-based tests for prediction reshaping.
//!
//! These tests verify invariants that should hold for every well-formed
//! prediction table, using randomly sized tables and datasets.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use std::path::Path;
use tsbench_quantile::core::{DataEntry, Dataset, PredictionTable, TimeSeriesFrame};
use tsbench_quantile::models::TabularModel;
use tsbench_quantile::predictor::{PredictOptions, QuantilePredictor};
use tsbench_quantile::Result;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Backend that answers each series with `horizon` rows of `fields` columns.
///
/// Cell `(step, field)` of series `s` holds `s * 1e6 + step * 1e3 + field`.
#[derive(Debug)]
struct Grid {
    horizon: usize,
    fields: usize,
}

impl TabularModel for Grid {
    const NAME: &'static str = "grid";

    fn predict(&self, frame: &TimeSeriesFrame) -> Result<PredictionTable> {
        let columns = (0..self.fields).map(|f| format!("q{f}")).collect();
        let mut table = PredictionTable::with_columns(columns);
        for (s, series) in frame.iter_series().enumerate() {
            let last = *series.timestamps.last().unwrap();
            for step in 0..self.horizon {
                let row: Vec<f64> = (0..self.fields)
                    .map(|f| s as f64 * 1e6 + step as f64 * 1e3 + f as f64)
                    .collect();
                table.push_row(
                    series.item_id,
                    last + Duration::hours(step as i64 + 1),
                    &row,
                )?;
            }
        }
        Ok(table)
    }

    fn save(&self) -> Result<()> {
        Ok(())
    }

    fn load(_path: &Path) -> Result<Self> {
        Ok(Grid {
            horizon: 1,
            fields: 1,
        })
    }
}

fn dataset_strategy(max_series: usize) -> impl Strategy<Value = Dataset> {
    prop::collection::vec(1usize..30, 0..max_series).prop_map(|lengths| {
        lengths
            .into_iter()
            .enumerate()
            .map(|(i, len)| {
                let values = (0..len).map(|v| v as f64).collect();
                DataEntry::new(format!("series_{i}"), base(), values)
            })
            .collect()
    })
}

// =============================================================================
// Property: one record per series, each shaped (fields, horizon)
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn record_count_and_shape_match_table(
        dataset in dataset_strategy(20),
        horizon in 1usize..12,
        fields in 1usize..6,
    ) {
        let predictor = QuantilePredictor::new(Grid { horizon, fields }, horizon, "H").unwrap();
        let forecasts: Vec<_> = predictor
            .predict(&dataset, &PredictOptions::default())
            .unwrap()
            .collect();

        prop_assert_eq!(forecasts.len(), dataset.len());
        for forecast in &forecasts {
            prop_assert_eq!(forecast.shape(), (fields, horizon));
        }
    }

    #[test]
    fn records_follow_table_blocks(
        dataset in dataset_strategy(12),
        horizon in 1usize..8,
        fields in 1usize..4,
    ) {
        let predictor = QuantilePredictor::new(Grid { horizon, fields }, horizon, "H").unwrap();
        let forecasts = predictor
            .predict(&dataset, &PredictOptions::default())
            .unwrap();
        let table = forecasts.table().clone();

        for (i, forecast) in forecasts.enumerate() {
            let (item_id, start) = &table.index()[i * horizon];
            prop_assert_eq!(forecast.item_id(), Some(item_id.as_str()));
            prop_assert_eq!(forecast.start_date(), *start);
            prop_assert_eq!(forecast.item_id(), Some(dataset.entries()[i].item_id()));

            for (f, array) in forecast.forecast_arrays().iter().enumerate() {
                for (step, value) in array.iter().enumerate() {
                    let expected = i as f64 * 1e6 + step as f64 * 1e3 + f as f64;
                    prop_assert_eq!(*value, expected);
                }
            }
        }
    }

    #[test]
    fn misaligned_tables_never_yield(
        dataset in dataset_strategy(6).prop_filter("non-empty", |d| !d.is_empty()),
        horizon in 2usize..8,
        offset in 1usize..8,
    ) {
        let model_horizon = horizon + (offset % horizon).max(1);
        let rows = dataset.len() * model_horizon;
        prop_assume!(rows % horizon != 0);

        let predictor =
            QuantilePredictor::new(Grid { horizon: model_horizon, fields: 1 }, horizon, "H").unwrap();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            predictor
                .predict(&dataset, &PredictOptions::default())
                .map(|forecasts| forecasts.count())
        }));
        prop_assert!(outcome.is_err());
    }
}
