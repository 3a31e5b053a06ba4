//! Tabular structures exchanged with wrapped forecasting backends.
//!
//! Backends consume a long-format [`TimeSeriesFrame`] (one row per observation)
//! and answer with a [`PredictionTable`] (one row per forecasted step, one
//! column per output field).

use crate::core::{Dataset, Frequency};
use crate::error::{AdapterError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::ops::Range;

/// Long-format input table indexed by `(item_id, timestamp)`.
///
/// Rows of one series are contiguous and ascending in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesFrame {
    item_ids: Vec<String>,
    timestamps: Vec<DateTime<Utc>>,
    target: Vec<f64>,
    /// Row range of each series, in dataset order.
    series: Vec<(String, Range<usize>)>,
}

/// Borrowed view of one series inside a [`TimeSeriesFrame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSeries<'a> {
    pub item_id: &'a str,
    pub timestamps: &'a [DateTime<Utc>],
    pub target: &'a [f64],
}

impl TimeSeriesFrame {
    /// Convert a dataset into long format, generating timestamps from each
    /// entry's start with the given frequency.
    ///
    /// Entries with an empty `item_id` are keyed by their position in the
    /// dataset.
    pub fn from_dataset(dataset: &Dataset, freq: &Frequency) -> Result<Self> {
        let total: usize = dataset.iter().map(|e| e.len()).sum();
        let mut frame = Self {
            item_ids: Vec::with_capacity(total),
            timestamps: Vec::with_capacity(total),
            target: Vec::with_capacity(total),
            series: Vec::with_capacity(dataset.len()),
        };
        let mut seen = HashSet::with_capacity(dataset.len());

        for (position, entry) in dataset.iter().enumerate() {
            let item_id = match entry.item_id() {
                "" => position.to_string(),
                id => id.to_string(),
            };
            if !seen.insert(item_id.clone()) {
                return Err(AdapterError::DuplicateItem(item_id));
            }
            if entry.is_empty() {
                return Err(AdapterError::InvalidParameter(format!(
                    "series '{item_id}' has no observations"
                )));
            }

            let begin = frame.target.len();
            frame.timestamps.extend(freq.range(entry.start(), entry.len())?);
            frame.target.extend_from_slice(entry.target());
            frame
                .item_ids
                .extend(std::iter::repeat(item_id.clone()).take(entry.len()));
            frame.series.push((item_id, begin..frame.target.len()));
        }

        Ok(frame)
    }

    /// Total number of observation rows.
    pub fn num_rows(&self) -> usize {
        self.target.len()
    }

    pub fn num_series(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn item_ids(&self) -> &[String] {
        &self.item_ids
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// View of the `index`-th series.
    pub fn series(&self, index: usize) -> Option<FrameSeries<'_>> {
        self.series.get(index).map(|(id, range)| FrameSeries {
            item_id: id,
            timestamps: &self.timestamps[range.clone()],
            target: &self.target[range.clone()],
        })
    }

    /// Iterate over series in dataset order.
    pub fn iter_series(&self) -> impl Iterator<Item = FrameSeries<'_>> + '_ {
        (0..self.series.len()).filter_map(move |i| self.series(i))
    }
}

/// Flat prediction output indexed by `(item_id, timestamp)`.
///
/// Values are stored row-major: `values[row * num_columns + column]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictionTable {
    index: Vec<(String, DateTime<Utc>)>,
    columns: Vec<String>,
    values: Vec<f64>,
}

impl PredictionTable {
    /// Create an empty table with the given value columns.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            index: Vec::new(),
            columns,
            values: Vec::new(),
        }
    }

    /// Create a table from an index and row-major rows.
    pub fn from_rows(
        index: Vec<(String, DateTime<Utc>)>,
        columns: Vec<String>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self> {
        if rows.len() != index.len() {
            return Err(AdapterError::DimensionMismatch {
                expected: index.len(),
                got: rows.len(),
            });
        }

        let mut table = Self::with_columns(columns);
        table.values.reserve(rows.len() * table.columns.len());
        for ((item_id, timestamp), row) in index.into_iter().zip(rows) {
            table.push_row(item_id, timestamp, &row)?;
        }
        Ok(table)
    }

    /// Append one row. The row must carry exactly one value per column.
    pub fn push_row(
        &mut self,
        item_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        row: &[f64],
    ) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(AdapterError::DimensionMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.index.push((item_id.into(), timestamp));
        self.values.extend_from_slice(row);
        Ok(())
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index(&self) -> &[(String, DateTime<Utc>)] {
        &self.index
    }

    /// Values of a single row.
    pub fn row(&self, row: usize) -> Result<&[f64]> {
        if row >= self.num_rows() {
            return Err(AdapterError::DimensionMismatch {
                expected: self.num_rows(),
                got: row,
            });
        }
        let width = self.num_columns();
        Ok(&self.values[row * width..(row + 1) * width])
    }

    /// Rows `rows` transposed to column-major: `out[column][step]`.
    ///
    /// Panics if the range exceeds the table.
    pub fn block_transposed(&self, rows: Range<usize>) -> Vec<Vec<f64>> {
        assert!(rows.end <= self.num_rows(), "row block out of bounds");
        let width = self.num_columns();
        (0..width)
            .map(|col| rows.clone().map(|r| self.values[r * width + col]).collect())
            .collect()
    }
}
