//! Meal catalog API

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/api/meals", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id));

    let admin_routes = Router::new()
        .route("/", post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete))
        .route("/seed", post(handler::seed))
        .route("/seed/default", post(handler::seed_default))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    read_routes.merge(admin_routes)
}
