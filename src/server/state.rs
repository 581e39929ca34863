//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::classifier::SymptomModel;

/// Process-wide immutable dependencies. The model is loaded once at
/// startup and never mutated, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub model: Arc<dyn SymptomModel>,
}

impl AppState {
    pub fn new(model: Arc<dyn SymptomModel>) -> Self {
        Self { model }
    }
}

pub type SharedState = Arc<AppState>;
