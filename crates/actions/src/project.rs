//! Project settings consumed by the engine: the threshold table.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::loader::Result;

/// Threshold key → numeric tuning value.
pub type Thresholds = IndexMap<String, f64>;

/// Client project as far as action selection is concerned.
///
/// Project files carry more (sources, output paths, domain); those keys are
/// ignored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub project_key: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub report_language: Option<String>,
    /// Non-numeric entries are dropped on load, so clauses using them fail.
    #[serde(default, deserialize_with = "numeric_thresholds")]
    pub thresholds: Thresholds,
}

fn numeric_thresholds<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Thresholds, D::Error> {
    let raw: Option<IndexMap<String, Value>> = Option::deserialize(deserializer)?;
    let mut thresholds = Thresholds::new();
    for (key, value) in raw.unwrap_or_default() {
        match value.as_f64() {
            Some(number) => {
                thresholds.insert(key, number);
            }
            None => warn!(threshold_key = %key, %value, "threshold is not a number; ignored"),
        }
    }
    Ok(thresholds)
}

impl Project {
    pub fn with_thresholds<I, K>(thresholds: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            thresholds: thresholds.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn threshold(&self, key: &str) -> Option<f64> {
        self.thresholds.get(key).copied()
    }
}
