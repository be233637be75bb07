use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Errors raised while loading an artifact or running a prediction.
#[derive(Debug)]
pub enum ModelError {
    /// The artifact could not be read from disk.
    Io { path: PathBuf, source: std::io::Error },
    /// The artifact was read but could not be decoded.
    Parse { path: PathBuf, message: String },
    /// The artifact decoded but its contents are inconsistent.
    InvalidArtifact(String),
    /// Unknown artifact format name.
    UnknownFormat(String),
    /// The request carried no features.
    EmptyFeatures,
    /// Feature count differs from the dimensionality the model was trained on.
    DimensionMismatch { expected: usize, got: usize },
    /// Feature at `index` is NaN or infinite after conversion to f32.
    NonFiniteFeature { index: usize },
    /// The model itself failed on an input that passed validation.
    Inference(String),
}

/// Result alias used throughout the crate.
pub type ModelResult<T> = Result<T, ModelError>;

impl ModelError {
    /// True for errors caused by the caller's feature vector rather than the model.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ModelError::EmptyFeatures
                | ModelError::DimensionMismatch { .. }
                | ModelError::NonFiniteFeature { .. }
        )
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ModelError::Io { path, source } => {
                write!(f, "Failed to read model artifact {}: {}", path.display(), source)
            }
            ModelError::Parse { path, message } => {
                write!(f, "Failed to parse model artifact {}: {}", path.display(), message)
            }
            ModelError::InvalidArtifact(msg) => write!(f, "Invalid model artifact: {}", msg),
            ModelError::UnknownFormat(name) => write!(
                f,
                "Unknown model format: {}. Expected one of: random_forest, gbdt",
                name
            ),
            ModelError::EmptyFeatures => write!(f, "Feature vector is empty"),
            ModelError::DimensionMismatch { expected, got } => write!(
                f,
                "Expected {} features, got {}",
                expected, got
            ),
            ModelError::NonFiniteFeature { index } => {
                write!(f, "Feature at index {} is not a finite number", index)
            }
            ModelError::Inference(msg) => write!(f, "Inference failed: {}", msg),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ModelError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
