//! QR tracker API and the public scan redirect
//!
//! | Path | Method | Access |
//! |------|--------|--------|
//! | /qrcodes/{id}/{*outlink} | GET | public |
//! | /api/qrcodes | GET, POST | admin |
//! | /api/qrcodes/{id} | GET, DELETE | admin |
//! | /api/qrcodes/{id}/visits | GET | admin |

mod handler;
mod redirect;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::ServerState;

pub fn router(state: &ServerState) -> Router<ServerState> {
    let admin_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/visits", get(handler::visits))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/qrcodes/{id}/{*outlink}", get(redirect::scan))
        .nest("/api/qrcodes", admin_routes)
}
