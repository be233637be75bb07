use std::path::Path;

use gbdt::decision_tree::{Data, DataVec};
use gbdt::gradient_boost::GBDT;
use serde::Deserialize;

use crate::config::{ModelConfig, ModelFormat};
use crate::error::{ModelError, ModelResult};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;

/// Binary Gradient Boosting Decision Tree (GBDT) classifier loaded from a
/// model saved by the `gbdt` crate.
pub struct GBDTClassifier {
    model: GBDT,
    n_features: usize,
    threshold: f32,
    classes: Vec<i64>,
}

/// The part of a saved `gbdt` model that records its training dimensionality.
#[derive(Deserialize)]
struct SavedModelHeader {
    conf: SavedConf,
}

#[derive(Deserialize)]
struct SavedConf {
    feature_size: usize,
}

impl GBDTClassifier {
    /// Load a saved GBDT model. Its feature count comes from the saved
    /// training config; `factory::load_model` checks it against `config.n_features`.
    pub fn load(config: &ModelConfig) -> ModelResult<Self> {
        if !config.threshold.is_finite() {
            return Err(ModelError::InvalidArtifact("threshold is not finite".to_string()));
        }
        let classes = config.classes.clone().unwrap_or_else(|| vec![0, 1]);
        if classes.len() != 2 {
            return Err(ModelError::InvalidArtifact(format!(
                "gbdt models are binary; expected 2 classes, got {}",
                classes.len()
            )));
        }

        let (model, n_features) = Self::read_model(&config.path)?;
        if n_features == 0 {
            return Err(ModelError::InvalidArtifact(
                "n_features must be greater than zero".to_string(),
            ));
        }
        Ok(GBDTClassifier {
            model,
            n_features,
            threshold: config.threshold,
            classes,
        })
    }

    fn read_model(path: &Path) -> ModelResult<(GBDT, usize)> {
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let header: SavedModelHeader =
            serde_json::from_str(&content).map_err(|e| ModelError::Parse {
                path: path.to_path_buf(),
                message: format!("missing conf.feature_size: {}", e),
            })?;

        let path_str = path.to_str().ok_or_else(|| ModelError::Parse {
            path: path.to_path_buf(),
            message: "path is not valid UTF-8".to_string(),
        })?;
        let model = GBDT::load_model(path_str).map_err(|e| ModelError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok((model, header.conf.feature_size))
    }

    /// Positive-class scores, one per row.
    pub fn decision_scores(&self, x: &Array2<f32>) -> ModelResult<Vec<f32>> {
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        let mut test_x = DataVec::new();
        for row in x.rows() {
            test_x.push(Data::new_test_data(row.to_vec(), None));
        }
        let scores = self.model.predict(&test_x);
        if scores.len() != x.nrows() {
            return Err(ModelError::Inference(format!(
                "gbdt returned {} scores for {} rows",
                scores.len(),
                x.nrows()
            )));
        }
        Ok(scores)
    }
}

impl ClassifierModel for GBDTClassifier {
    fn predict(&self, x: &Array2<f32>) -> ModelResult<Vec<i64>> {
        let scores = self.decision_scores(x)?;
        scores
            .into_iter()
            .map(|s| {
                if !s.is_finite() {
                    return Err(ModelError::Inference(format!("gbdt produced non-finite score {}", s)));
                }
                Ok(if s >= self.threshold {
                    self.classes[1]
                } else {
                    self.classes[0]
                })
            })
            .collect()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn format(&self) -> ModelFormat {
        ModelFormat::GBDT
    }

    fn name(&self) -> &str {
        "gbdt"
    }
}
