use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::ModelError;

/// Where the model artifact lives and how to interpret it.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    pub format: ModelFormat,

    /// Feature dimensionality the model was trained on. Optional; when set it
    /// must match what the artifact records.
    pub n_features: Option<usize>,

    /// Optional names for the feature columns, reported by the metadata endpoint.
    pub feature_names: Option<Vec<String>>,

    /// Decision threshold on the positive-class score (gbdt only).
    pub threshold: f32,

    /// Labels for the negative and positive class (gbdt only).
    pub classes: Option<Vec<i64>>,
}

/// Supported on-disk artifact formats.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModelFormat {
    RandomForest,
    #[serde(rename = "gbdt")]
    GBDT,
}

impl Default for ModelFormat {
    fn default() -> Self {
        ModelFormat::RandomForest
    }
}

impl ModelFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFormat::RandomForest => "random_forest",
            ModelFormat::GBDT => "gbdt",
        }
    }
}

impl fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "random_forest" | "rf" => Ok(ModelFormat::RandomForest),
            "gbdt" => Ok(ModelFormat::GBDT),
            _ => Err(ModelError::UnknownFormat(s.to_string())),
        }
    }
}

impl ModelConfig {
    pub fn new<P: Into<PathBuf>>(path: P, format: ModelFormat) -> Self {
        Self {
            path: path.into(),
            format,
            ..Self::default()
        }
    }

    pub fn with_n_features(mut self, n_features: usize) -> Self {
        self.n_features = Some(n_features);
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("random_forest_model.json"),
            format: ModelFormat::RandomForest,
            n_features: None,
            feature_names: None,
            threshold: 0.5,
            classes: None,
        }
    }
}
