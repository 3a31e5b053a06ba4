//! Scalar predictor settings persisted next to the wrapped model.

use crate::error::{AdapterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the metadata file inside a predictor directory.
pub const METADATA_FILE: &str = "metadata.json";

/// `{freq, prediction_length}` as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorMetadata {
    pub freq: String,
    pub prediction_length: usize,
}

impl PredictorMetadata {
    pub fn new(freq: impl Into<String>, prediction_length: usize) -> Self {
        Self {
            freq: freq.into(),
            prediction_length,
        }
    }

    /// Location of the metadata file under `dir`.
    pub fn file_in(dir: &Path) -> PathBuf {
        dir.join(METADATA_FILE)
    }

    /// Write the metadata as JSON into `dir`, creating the directory if needed.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).map_err(|e| AdapterError::io(dir, e))?;
        let file = Self::file_in(dir);
        let json = serde_json::to_string(self).map_err(|e| AdapterError::metadata(&file, e))?;
        fs::write(&file, json).map_err(|e| AdapterError::io(&file, e))?;
        Ok(file)
    }

    /// Read the metadata file from `dir`.
    pub fn read_from(dir: &Path) -> Result<Self> {
        let file = Self::file_in(dir);
        let json = fs::read_to_string(&file).map_err(|e| AdapterError::io(&file, e))?;
        serde_json::from_str(&json).map_err(|e| AdapterError::metadata(&file, e))
    }
}
