//! The HTTP surface: one analyze route plus middleware.

mod analyze;
mod error;
mod router;
mod state;

pub use analyze::analyze;
pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, SharedState};
