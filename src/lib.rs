//! A symptom-mention scoring service for social-media posts.
//!
//! One endpoint, `POST /analyze`, accepts a CSV of posts, runs every text
//! through a pre-trained multi-label ONNX classifier, derives a relevance
//! flag and an engagement-weighted importance score per post, and returns
//! the batch as a JSON array sorted by score.
//!
//! The model artifact (tokenizer + ONNX graph) is loaded once at startup
//! and shared read-only across requests:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use symptomscan::{ArtifactStore, SymptomClassifier, AppState, build_router};
//!
//! let store = ArtifactStore::new("model");
//! store.verify()?;
//!
//! let classifier = SymptomClassifier::builder()
//!     .with_artifact(&store)?
//!     .build()?;
//!
//! let app = build_router(AppState::new(Arc::new(classifier)));
//! # Ok(())
//! # }
//! ```
//!
//! # Thread safety
//!
//! [`SymptomClassifier`] is `Send + Sync`; the router holds it behind an
//! `Arc` and never mutates it, so requests share it without locking.

pub mod artifact;
pub mod classifier;
pub mod records;
mod runtime;
pub mod scoring;
pub mod server;

pub use artifact::{ArtifactError, ArtifactStore};
pub use classifier::{
    ClassifierBuilder, ClassifierError, ClassifierInfo, SymptomClassifier, SymptomFlags,
    SymptomModel, SYMPTOM_LABELS,
};
pub use records::{ScoredTweet, TweetRecord, REQUIRED_COLUMNS};
pub use runtime::RuntimeConfig;
pub use server::{build_router, AppState, SharedState};
