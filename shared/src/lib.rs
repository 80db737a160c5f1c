//! Shared types for the POS workspace
//!
//! Domain models, the unified error system and id/time utilities used by
//! the server and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode, ErrorResponse};
