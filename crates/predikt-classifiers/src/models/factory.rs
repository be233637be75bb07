use crate::config::{ModelConfig, ModelFormat};
use crate::error::{ModelError, ModelResult};
use crate::models::classifier_trait::ClassifierModel;

/// Load the artifact named by `config` into a boxed, shareable classifier.
///
/// The declared `n_features` in the configuration must agree with whatever the
/// artifact itself records; a disagreement is a load failure, not a warning.
pub fn load_model(config: &ModelConfig) -> ModelResult<Box<dyn ClassifierModel>> {
    log::info!(
        "Loading {} model artifact from {}",
        config.format,
        config.path.display()
    );

    let model: Box<dyn ClassifierModel> = match config.format {
        ModelFormat::RandomForest => {
            Box::new(crate::models::forest::RandomForestClassifier::load(&config.path)?)
        }
        ModelFormat::GBDT => Box::new(crate::models::gbdt::GBDTClassifier::load(config)?),
    };

    if let (Some(declared), Some(recorded)) = (config.n_features, model.n_features()) {
        if declared != recorded {
            return Err(ModelError::InvalidArtifact(format!(
                "configuration declares {} features but the artifact was trained on {}",
                declared, recorded
            )));
        }
    }

    log::info!(
        "Loaded {} model: {} features, classes {:?}",
        model.name(),
        model
            .n_features()
            .or(config.n_features)
            .map(|n| n.to_string())
            .unwrap_or_else(|| "unknown".to_string()),
        model.classes()
    );
    Ok(model)
}
