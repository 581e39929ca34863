use ort::session::Session;
use std::path::Path;
use std::sync::Arc;
use tokenizers::Tokenizer;
use tracing::{error, info};

use super::encoding::TextEncoder;
use super::error::ClassifierError;
use super::model::SymptomClassifier;
use crate::artifact::ArtifactStore;
use crate::runtime::{create_session_builder, RuntimeConfig};

/// Fluent construction of a [`SymptomClassifier`].
///
/// ```no_run
/// # fn main() -> Result<(), symptomscan::ClassifierError> {
/// use symptomscan::{ArtifactStore, SymptomClassifier};
///
/// let store = ArtifactStore::new("model");
/// let classifier = SymptomClassifier::builder()
///     .with_artifact(&store)?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ClassifierBuilder {
    model_path: Option<String>,
    tokenizer_path: Option<String>,
    tokenizer: Option<Tokenizer>,
    session: Option<Session>,
    max_sequence_length: Option<usize>,
    runtime_config: RuntimeConfig,
}

impl TextEncoder for ClassifierBuilder {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        self.tokenizer.as_ref()
    }

    fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn max_sequence_length(&self) -> Option<usize> {
        Some(self.max_sequence_length.unwrap_or(DEFAULT_MAX_SEQUENCE_LENGTH))
    }
}

const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

impl ClassifierBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ONNX Runtime configuration used when the session is created.
    pub fn with_runtime_config(mut self, config: RuntimeConfig) -> Self {
        self.runtime_config = config;
        self
    }

    /// Overrides the maximum token length accepted per text (default 256).
    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = Some(max_sequence_length);
        self
    }

    /// Loads the tokenizer and model from a verified artifact store.
    pub fn with_artifact(self, store: &ArtifactStore) -> Result<Self, ClassifierError> {
        store.verify().map_err(|e| {
            error!("Artifact verification failed: {}", e);
            ClassifierError::BuildError(format!("Artifact verification failed: {}", e))
        })?;
        self.with_paths(&store.model_path(), &store.tokenizer_path())
    }

    /// Loads the tokenizer and model from explicit file paths.
    pub fn with_paths(
        mut self,
        model_path: &Path,
        tokenizer_path: &Path,
    ) -> Result<Self, ClassifierError> {
        if self.model_path.is_some() || self.tokenizer_path.is_some() {
            return Err(ClassifierError::BuildError(
                "Model and tokenizer paths already set".to_string(),
            ));
        }

        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| {
            error!("Failed to load tokenizer: {}", e);
            ClassifierError::BuildError(format!("Failed to load tokenizer: {}", e))
        })?;
        info!("Tokenizer loaded from {}", tokenizer_path.display());

        // Sessions come out of the process-wide ONNX environment.
        let session = create_session_builder(&self.runtime_config)?
            .commit_from_file(model_path)?;
        info!("Model session created from {}", model_path.display());

        self.tokenizer = Some(tokenizer);
        self.session = Some(session);
        self.model_path = Some(model_path.to_string_lossy().into_owned());
        self.tokenizer_path = Some(tokenizer_path.to_string_lossy().into_owned());
        Ok(self)
    }

    /// Builds the classifier, running one probe inference to confirm the
    /// model's output width matches the symptom label set. The probe makes
    /// a label-set mismatch a startup failure instead of a runtime one.
    pub fn build(self) -> Result<SymptomClassifier, ClassifierError> {
        let (Some(model_path), Some(tokenizer_path)) =
            (self.model_path.clone(), self.tokenizer_path.clone())
        else {
            return Err(ClassifierError::BuildError(
                "Model and tokenizer must be set before building".to_string(),
            ));
        };

        let probe = self.predict_flags(&["cough and fever reported"])?;
        info!("Probe inference succeeded ({} row)", probe.len());

        let max_sequence_length = self
            .max_sequence_length
            .unwrap_or(DEFAULT_MAX_SEQUENCE_LENGTH);
        let (Some(tokenizer), Some(session)) = (self.tokenizer, self.session) else {
            return Err(ClassifierError::BuildError(
                "Tokenizer and session must be loaded before building".to_string(),
            ));
        };

        Ok(SymptomClassifier {
            model_path,
            tokenizer_path,
            max_sequence_length,
            tokenizer: Arc::new(tokenizer),
            session: Arc::new(session),
        })
    }
}
