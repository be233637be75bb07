//! Validated single-row inference over a loaded classifier.
//!
//! `Predictor` is the immutable service context: it owns the model for the
//! life of the process and checks every feature vector against the declared
//! dimensionality before the model sees it.
use serde::{Deserialize, Serialize};

use crate::config::{ModelConfig, ModelFormat};
use crate::error::{ModelError, ModelResult};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;
use crate::models::factory::load_model;

pub struct Predictor {
    model: Box<dyn ClassifierModel>,
    n_features: usize,
    feature_names: Option<Vec<String>>,
}

/// Metadata describing the loaded model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub format: ModelFormat,
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub feature_names: Option<Vec<String>>,
}

impl Predictor {
    /// Load the configured artifact. Any failure here is fatal for the caller.
    pub fn from_config(config: &ModelConfig) -> ModelResult<Self> {
        let model = load_model(config)?;
        Self::new(model, config.n_features, config.feature_names.clone())
    }

    pub fn new(
        model: Box<dyn ClassifierModel>,
        n_features: Option<usize>,
        feature_names: Option<Vec<String>>,
    ) -> ModelResult<Self> {
        let n_features = model.n_features().or(n_features).ok_or_else(|| {
            ModelError::InvalidArtifact("feature count is unknown; set model.n_features".to_string())
        })?;

        if let Some(names) = &feature_names {
            if names.len() != n_features {
                return Err(ModelError::InvalidArtifact(format!(
                    "{} feature names given for {} features",
                    names.len(),
                    n_features
                )));
            }
        }

        Ok(Predictor {
            model,
            n_features,
            feature_names,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Check a raw feature vector and convert it to the model's input type.
    pub fn validate(&self, features: &[f64]) -> ModelResult<Vec<f32>> {
        if features.is_empty() {
            return Err(ModelError::EmptyFeatures);
        }
        if features.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }
        features
            .iter()
            .enumerate()
            .map(|(index, &v)| {
                let v = v as f32;
                if v.is_finite() {
                    Ok(v)
                } else {
                    Err(ModelError::NonFiniteFeature { index })
                }
            })
            .collect()
    }

    /// Validate, reshape to a single row, predict, and return the only label.
    pub fn predict_one(&self, features: &[f64]) -> ModelResult<i64> {
        let row = self.validate(features)?;
        let x = Array2::from_row(row);
        let labels = self.model.predict(&x)?;
        labels
            .first()
            .copied()
            .ok_or_else(|| ModelError::Inference("model returned no prediction".to_string()))
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.model.name().to_string(),
            format: self.model.format(),
            n_features: self.n_features,
            classes: self.model.classes().to_vec(),
            feature_names: self.feature_names.clone(),
        }
    }
}
