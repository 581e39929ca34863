use ndarray::Array2;
use ort::session::Session;
use ort::value::Tensor;
use std::collections::HashMap;
use tokenizers::Tokenizer;

use super::error::ClassifierError;
use super::{SymptomFlags, SYMPTOM_LABELS};

/// Turns batches of text into symptom flags through the tokenizer and the
/// ONNX session.
///
/// The model is expected to:
/// - accept `input_ids` and `attention_mask`, both `[batch, seq_len]`
/// - output per-label scores of shape `[batch, num_labels]`
///
/// Implemented by both the builder (for the probe inference during
/// construction) and the finished classifier.
pub(crate) trait TextEncoder {
    fn tokenizer(&self) -> Option<&Tokenizer>;

    fn session(&self) -> Option<&Session>;

    fn max_sequence_length(&self) -> Option<usize>;

    /// Encodes one text into token IDs.
    ///
    /// # Errors
    /// - `ValidationError` for empty text or text over the sequence limit
    /// - `TokenizerError` if the tokenizer is missing or encoding fails
    fn tokenize(&self, text: &str) -> Result<Vec<u32>, ClassifierError> {
        if text.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Input text cannot be empty".into(),
            ));
        }
        let tokenizer = self
            .tokenizer()
            .ok_or_else(|| ClassifierError::TokenizerError("Tokenizer not initialized".into()))?;
        let max_length = self
            .max_sequence_length()
            .ok_or_else(|| ClassifierError::TokenizerError("Max sequence length not set".into()))?;

        let encoding = tokenizer
            .encode(text, false)
            .map_err(|e| ClassifierError::TokenizerError(e.to_string()))?;
        let token_ids = encoding.get_ids();

        if token_ids.len() > max_length {
            return Err(ClassifierError::ValidationError(format!(
                "Input text too long: {} tokens (max: {})",
                token_ids.len(),
                max_length
            )));
        }

        Ok(token_ids.to_vec())
    }

    /// Runs one batch through the model and thresholds every row into
    /// [`SymptomFlags`].
    ///
    /// The whole batch succeeds or fails as a unit; an empty batch
    /// short-circuits without touching the session.
    fn predict_flags(&self, texts: &[&str]) -> Result<Vec<SymptomFlags>, ClassifierError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let session = self
            .session()
            .ok_or_else(|| ClassifierError::ModelError("Session not initialized".into()))?;

        let mut encoded = Vec::with_capacity(texts.len());
        for text in texts {
            encoded.push(self.tokenize(text)?);
        }

        // Pad to the longest row of the batch; mask out the padding.
        let rows = encoded.len();
        let seq_len = encoded.iter().map(Vec::len).max().unwrap_or(1);
        let mut ids = Vec::with_capacity(rows * seq_len);
        let mut mask = Vec::with_capacity(rows * seq_len);
        for tokens in &encoded {
            for position in 0..seq_len {
                match tokens.get(position) {
                    Some(&id) => {
                        ids.push(id as i64);
                        mask.push(1i64);
                    }
                    None => {
                        ids.push(0);
                        mask.push(0);
                    }
                }
            }
        }

        let input_array = Array2::from_shape_vec((rows, seq_len), ids)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create input array: {}", e)))?;
        let input_dyn = input_array.into_dyn();
        let input_ids = input_dyn.as_standard_layout();

        let mask_array = Array2::from_shape_vec((rows, seq_len), mask)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to create mask array: {}", e)))?;
        let mask_dyn = mask_array.into_dyn();
        let attention_mask = mask_dyn.as_standard_layout();

        let mut input_tensors = HashMap::new();
        input_tensors.insert(
            "input_ids",
            Tensor::from_array(&input_ids).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create input tensor: {}", e))
            })?,
        );
        input_tensors.insert(
            "attention_mask",
            Tensor::from_array(&attention_mask).map_err(|e| {
                ClassifierError::ModelError(format!("Failed to create mask tensor: {}", e))
            })?,
        );

        let outputs = session
            .run(input_tensors)
            .map_err(|e| ClassifierError::ModelError(format!("Failed to run model: {}", e)))?;
        let scores = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifierError::ModelError(format!("Failed to extract output tensor: {}", e)))?;

        let shape = scores.shape();
        if shape.len() != 2 || shape[0] != rows || shape[1] != SYMPTOM_LABELS.len() {
            return Err(ClassifierError::PredictionError(format!(
                "unexpected output shape {:?} for batch of {} rows and {} labels",
                shape,
                rows,
                SYMPTOM_LABELS.len()
            )));
        }

        let mut flags = Vec::with_capacity(rows);
        for row in 0..rows {
            let row_scores: Vec<f32> = scores.slice(ndarray::s![row, ..]).iter().cloned().collect();
            flags.push(SymptomFlags::from_scores(&row_scores)?);
        }

        Ok(flags)
    }
}
