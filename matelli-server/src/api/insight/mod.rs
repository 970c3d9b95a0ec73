//! Nutrition insight API
//!
//! `POST /api/insight` answers with feedback text; provider failures fall
//! back to a fixed message instead of an error.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/insight", post(handler::insight))
}
