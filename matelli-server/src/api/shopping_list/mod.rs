//! Consolidated shopping list API (admin)

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/shopping-list", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view))
        .route("/share", get(handler::share))
        .route("/purchased", post(handler::mark_purchased))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin))
}
