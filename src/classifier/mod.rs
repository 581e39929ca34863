//! Multi-label symptom detection over post text.
//!
//! The classifier pairs a `tokenizers` tokenizer with an ONNX multi-label
//! head: text goes in, one presence/absence bit per symptom label comes
//! out. Labels are fixed and ordered; the model's output width must match
//! them exactly.

mod builder;
mod encoding;
mod error;
mod model;

pub use builder::ClassifierBuilder;
pub use error::ClassifierError;
pub use model::{ClassifierInfo, SymptomClassifier, SymptomModel};

/// Fixed ordered symptom label set. Classifier output positions map to
/// this list one-to-one.
pub const SYMPTOM_LABELS: [&str; 5] = [
    "respiratory",
    "fever",
    "fatigue",
    "pain",
    "gastrointestinal",
];

/// One presence/absence bit per entry of [`SYMPTOM_LABELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SymptomFlags([bool; SYMPTOM_LABELS.len()]);

impl SymptomFlags {
    pub fn new(bits: [bool; SYMPTOM_LABELS.len()]) -> Self {
        Self(bits)
    }

    /// Builds flags from one row of classifier scores; a label is present
    /// when its score exceeds 0.5 (a sigmoid head's decision boundary).
    ///
    /// Fails when the row width does not match the label set.
    pub fn from_scores(scores: &[f32]) -> Result<Self, ClassifierError> {
        if scores.len() != SYMPTOM_LABELS.len() {
            return Err(ClassifierError::PredictionError(format!(
                "classifier emitted {} labels per row, expected {}",
                scores.len(),
                SYMPTOM_LABELS.len()
            )));
        }
        let mut bits = [false; SYMPTOM_LABELS.len()];
        for (bit, score) in bits.iter_mut().zip(scores) {
            *bit = *score > 0.5;
        }
        Ok(Self(bits))
    }

    /// True when at least one symptom label is detected.
    pub fn any(&self) -> bool {
        self.0.iter().any(|&b| b)
    }

    /// Detected label names, preserving label-set order.
    pub fn detected(&self) -> Vec<String> {
        SYMPTOM_LABELS
            .iter()
            .zip(self.0)
            .filter(|(_, present)| *present)
            .map(|(label, _)| label.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detected_preserves_label_order() {
        let flags = SymptomFlags::new([true, false, true, false, true]);
        assert_eq!(
            flags.detected(),
            vec!["respiratory", "fatigue", "gastrointestinal"]
        );
        assert!(flags.any());
    }

    #[test]
    fn test_no_detection() {
        let flags = SymptomFlags::default();
        assert!(!flags.any());
        assert!(flags.detected().is_empty());
    }

    #[test]
    fn test_from_scores_thresholds_at_half() {
        let flags = SymptomFlags::from_scores(&[0.51, 0.5, 0.49, 1.0, 0.0]).unwrap();
        assert_eq!(flags, SymptomFlags::new([true, false, false, true, false]));
    }

    #[test]
    fn test_from_scores_rejects_wrong_width() {
        let result = SymptomFlags::from_scores(&[0.9, 0.9]);
        assert!(matches!(
            result,
            Err(ClassifierError::PredictionError(_))
        ));
    }
}
