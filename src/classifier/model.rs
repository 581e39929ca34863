use ort::session::Session;
use std::sync::Arc;
use tokenizers::Tokenizer;

use super::encoding::TextEncoder;
use super::error::ClassifierError;
use super::{SymptomFlags, SYMPTOM_LABELS};

/// The batch-prediction seam between the HTTP layer and the model.
///
/// The handler depends on this trait rather than on the concrete ONNX
/// classifier, so tests can drive the full request path with a stub.
pub trait SymptomModel: Send + Sync {
    /// Classifies a batch of texts, one [`SymptomFlags`] per input, in
    /// input order. The batch succeeds or fails as a whole.
    fn predict_batch(&self, texts: &[&str]) -> Result<Vec<SymptomFlags>, ClassifierError>;
}

/// A thread-safe multi-label symptom classifier over an ONNX model.
///
/// All fields are immutable after construction; `Arc`-wrapped session and
/// tokenizer make the type `Send + Sync`, so one instance serves every
/// request concurrently without locking.
#[derive(Debug)]
pub struct SymptomClassifier {
    pub model_path: String,
    pub tokenizer_path: String,
    pub max_sequence_length: usize,
    pub(crate) tokenizer: Arc<Tokenizer>,
    pub(crate) session: Arc<Session>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<SymptomClassifier>();
    }
};

/// A snapshot of the classifier's configuration, for startup logging.
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    pub model_path: String,
    pub tokenizer_path: String,
    pub num_labels: usize,
    pub labels: Vec<&'static str>,
    pub max_sequence_length: usize,
}

impl TextEncoder for SymptomClassifier {
    fn tokenizer(&self) -> Option<&Tokenizer> {
        Some(&self.tokenizer)
    }

    fn session(&self) -> Option<&Session> {
        Some(&self.session)
    }

    fn max_sequence_length(&self) -> Option<usize> {
        Some(self.max_sequence_length)
    }
}

impl SymptomClassifier {
    /// Creates a new builder for fluent construction.
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    pub fn info(&self) -> ClassifierInfo {
        ClassifierInfo {
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            num_labels: SYMPTOM_LABELS.len(),
            labels: SYMPTOM_LABELS.to_vec(),
            max_sequence_length: self.max_sequence_length,
        }
    }
}

impl SymptomModel for SymptomClassifier {
    fn predict_batch(&self, texts: &[&str]) -> Result<Vec<SymptomFlags>, ClassifierError> {
        self.predict_flags(texts)
    }
}
