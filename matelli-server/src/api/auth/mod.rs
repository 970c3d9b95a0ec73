//! Admin login
//!
//! `POST /api/auth/login` lets the admin screen check a passphrase before
//! sending it on every admin request.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/auth/login", post(handler::login))
}
