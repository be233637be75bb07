//! Random forest classifier read from a JSON tree dump.
//!
//! Each tree is a flat node array with node 0 as the root. Splits follow
//! `x[feature] <= threshold` to the left child. Leaves carry per-class
//! weights aligned with `classes`; they are normalized to probabilities at
//! load time and averaged across trees at prediction time.
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ModelFormat;
use crate::error::{ModelError, ModelResult};
use crate::math::Array2;
use crate::models::classifier_trait::ClassifierModel;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct RandomForestClassifier {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<DecisionTree>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DecisionTree {
    pub nodes: Vec<Node>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f32>,
    },
}

impl RandomForestClassifier {
    /// Read, decode and validate an artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let forest: RandomForestClassifier =
            serde_json::from_str(&content).map_err(|e| ModelError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        forest.into_validated()
    }

    /// Validate the structure and normalize leaf weights to probabilities.
    pub fn into_validated(mut self) -> ModelResult<Self> {
        self.validate()?;
        for tree in &mut self.trees {
            for node in &mut tree.nodes {
                if let Node::Leaf { value } = node {
                    let total: f32 = value.iter().sum();
                    value.iter_mut().for_each(|v| *v /= total);
                }
            }
        }
        Ok(self)
    }

    fn validate(&self) -> ModelResult<()> {
        let invalid = |msg: String| Err(ModelError::InvalidArtifact(msg));

        if self.n_features == 0 {
            return invalid("n_features must be greater than zero".to_string());
        }
        if self.classes.is_empty() {
            return invalid("classes must not be empty".to_string());
        }
        if self.trees.is_empty() {
            return invalid("forest has no trees".to_string());
        }

        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return invalid(format!("tree {} has no nodes", t));
            }
            let n_nodes = tree.nodes.len();
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    Node::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= self.n_features {
                            return invalid(format!(
                                "tree {} node {}: feature index {} out of range for {} features",
                                t, i, feature, self.n_features
                            ));
                        }
                        if !threshold.is_finite() {
                            return invalid(format!("tree {} node {}: threshold is not finite", t, i));
                        }
                        // Children must point forward so every walk terminates.
                        for child in [*left, *right] {
                            if child <= i || child >= n_nodes {
                                return invalid(format!(
                                    "tree {} node {}: child index {} is out of range",
                                    t, i, child
                                ));
                            }
                        }
                    }
                    Node::Leaf { value } => {
                        if value.len() != self.classes.len() {
                            return invalid(format!(
                                "tree {} node {}: leaf has {} weights for {} classes",
                                t,
                                i,
                                value.len(),
                                self.classes.len()
                            ));
                        }
                        if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                            return invalid(format!(
                                "tree {} node {}: leaf weights must be finite and non-negative",
                                t, i
                            ));
                        }
                        if value.iter().sum::<f32>() <= 0.0 {
                            return invalid(format!("tree {} node {}: leaf weights sum to zero", t, i));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Mean class probabilities for one row.
    pub fn predict_proba_row(&self, row: &[f32]) -> ModelResult<Vec<f32>> {
        if row.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }

        // Walk trees in parallel but sum in tree order so results are bit-for-bit repeatable.
        let leaves = self
            .trees
            .par_iter()
            .map(|tree| tree.leaf_for(row))
            .collect::<ModelResult<Vec<&[f32]>>>()?;

        let mut proba = vec![0.0f32; self.classes.len()];
        for leaf in leaves {
            for (acc, v) in proba.iter_mut().zip(leaf) {
                *acc += v;
            }
        }
        let n_trees = self.trees.len() as f32;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    pub fn predict_row(&self, row: &[f32]) -> ModelResult<i64> {
        let proba = self.predict_proba_row(row)?;
        let mut best = 0;
        for (i, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = i;
            }
        }
        Ok(self.classes[best])
    }
}

impl DecisionTree {
    fn leaf_for(&self, row: &[f32]) -> ModelResult<&[f32]> {
        let mut idx = 0;
        // Bounded by node count in case the tree was built without validation.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return Ok(value.as_slice()),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature).ok_or_else(|| {
                        ModelError::Inference(format!("split on missing feature {}", feature))
                    })?;
                    idx = if *x <= *threshold { *left } else { *right };
                }
                None => {
                    return Err(ModelError::Inference(format!("node index {} out of range", idx)))
                }
            }
        }
        Err(ModelError::Inference("tree walk did not reach a leaf".to_string()))
    }
}

impl ClassifierModel for RandomForestClassifier {
    fn predict(&self, x: &Array2<f32>) -> ModelResult<Vec<i64>> {
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                got: x.ncols(),
            });
        }
        x.rows().map(|row| self.predict_row(row)).collect()
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn format(&self) -> ModelFormat {
        ModelFormat::RandomForest
    }

    fn name(&self) -> &str {
        "random_forest"
    }
}
