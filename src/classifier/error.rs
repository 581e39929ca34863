use ort::Error as OrtError;

/// Errors raised while loading or running the symptom classifier.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Tokenizer error: {0}")]
    TokenizerError(String),
    #[error("Model error: {0}")]
    ModelError(String),
    #[error("Build error: {0}")]
    BuildError(String),
    #[error("Prediction error: {0}")]
    PredictionError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<OrtError> for ClassifierError {
    fn from(err: OrtError) -> Self {
        ClassifierError::BuildError(err.to_string())
    }
}
