//! Shared types for the Matelli storefront
//!
//! Domain models, the unified error system and small helpers used by
//! matelli-server and mirrored by the storefront frontend.

pub mod error;
pub mod models;
pub mod util;
pub mod validation;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};
