//! Host-side series collection consumed by predictors.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// A single input series: an item key, a start timestamp and its observations.
///
/// Missing observations are represented as `NaN` and passed through untouched.
/// When decoding, `item_id` may be absent (it becomes empty and the frame
/// conversion substitutes the entry's position) and observations may be
/// `null` or the string `"NaN"`. Missing values are written back as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEntry {
    #[serde(default)]
    item_id: String,
    start: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_target")]
    target: Vec<f64>,
}

fn deserialize_target<'de, D>(deserializer: D) -> std::result::Result<Vec<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Observation {
        Number(Option<f64>),
        Text(String),
    }

    Vec::<Observation>::deserialize(deserializer)?
        .into_iter()
        .map(|obs| match obs {
            Observation::Number(value) => Ok(value.unwrap_or(f64::NAN)),
            Observation::Text(text) if text.eq_ignore_ascii_case("nan") => Ok(f64::NAN),
            Observation::Text(text) => Err(de::Error::custom(format!(
                "invalid observation '{text}', expected a number, null or \"NaN\""
            ))),
        })
        .collect()
}

impl DataEntry {
    pub fn new(item_id: impl Into<String>, start: DateTime<Utc>, target: Vec<f64>) -> Self {
        Self {
            item_id: item_id.into(),
            start,
            target,
        }
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }
}

/// Ordered collection of input series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    entries: Vec<DataEntry>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: DataEntry) {
        self.entries.push(entry);
    }

    /// Builder-style append.
    pub fn with_entry(mut self, entry: DataEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DataEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DataEntry> {
        self.entries.iter()
    }
}

impl From<Vec<DataEntry>> for Dataset {
    fn from(entries: Vec<DataEntry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<DataEntry> for Dataset {
    fn from_iter<I: IntoIterator<Item = DataEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Dataset {
    type Item = DataEntry;
    type IntoIter = std::vec::IntoIter<DataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a DataEntry;
    type IntoIter = std::slice::Iter<'a, DataEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
