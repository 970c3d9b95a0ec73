//! Checkout and order administration API
//!
//! | Path | Method | Access |
//! |------|--------|--------|
//! | /api/checkout | POST | public |
//! | /api/checkout/preview | POST | public |
//! | /api/orders | GET | admin |
//! | /api/orders/{id} | GET, DELETE | admin |
//! | /api/orders/{id}/status | PUT | admin |
//! | /api/orders/{id}/summary | GET | admin |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let checkout_routes = Router::new()
        .route("/api/checkout", post(handler::checkout))
        .route("/api/checkout/preview", post(handler::preview));

    let admin_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/summary", get(handler::summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    checkout_routes.nest("/api/orders", admin_routes)
}
