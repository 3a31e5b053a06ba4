//! Contract for wrapped tabular forecasting backends.

use crate::core::{PredictionTable, TimeSeriesFrame};
use crate::error::Result;
use std::path::Path;

/// A trained tabular forecasting model that a predictor can wrap.
///
/// Implementations answer a whole [`TimeSeriesFrame`] in one call. The
/// returned table must hold the same number of rows for every series, with
/// each series' rows contiguous and ascending in time.
pub trait TabularModel {
    /// Short name used in logs and errors.
    const NAME: &'static str;

    /// Check that the backend can be used in this build.
    ///
    /// Called by predictors before wrapping a model.
    fn check_available() -> Result<()> {
        Ok(())
    }

    /// Forecast every series of the frame.
    fn predict(&self, frame: &TimeSeriesFrame) -> Result<PredictionTable>;

    /// Persist the model to its own configured location.
    fn save(&self) -> Result<()>;

    /// Restore a model previously saved under `path`.
    fn load(path: &Path) -> Result<Self>
    where
        Self: Sized;
}
