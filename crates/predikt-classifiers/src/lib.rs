//! predikt-classifiers: load a pre-trained classifier once and serve
//! validated single-row predictions from it.
//!
//! Two artifact formats are supported: a JSON random forest dump and models
//! saved by the `gbdt` crate. Both load behind the [`models::classifier_trait::ClassifierModel`]
//! trait; [`predictor::Predictor`] adds the input checks every caller needs.
pub mod config;
pub mod error;
pub mod math;
pub mod models;
pub mod predictor;

pub use config::{ModelConfig, ModelFormat};
pub use error::{ModelError, ModelResult};
pub use predictor::{ModelInfo, Predictor};
