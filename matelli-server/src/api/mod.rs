//! API 路由模块
//!
//! # 结构
//!
//! | 模块 | 前缀 | 访问权限 |
//! |--------|--------|--------|
//! | [`health`] | /health | public |
//! | [`auth`] | /api/auth | public |
//! | [`meals`] | /api/meals | read public, write admin |
//! | [`orders`] | /api/checkout, /api/orders | checkout public, orders admin |
//! | [`shopping_list`] | /api/shopping-list | admin |
//! | [`qrcodes`] | /api/qrcodes, /qrcodes | admin, redirect public |
//! | [`insight`] | /api/insight | public |

pub mod auth;
pub mod health;
pub mod insight;
pub mod meals;
pub mod orders;
pub mod qrcodes;
pub mod shopping_list;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

pub use crate::utils::{AppError, AppResult};

/// 访问日志中间件：每个请求一行 `method uri status`
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    tracing::info!(target: "http_access", "{} {} {}", method, uri, response.status());
    response
}

/// 汇总所有路由（尚未注入状态）
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(meals::router(state))
        .merge(orders::router(state))
        .merge(shopping_list::router(state))
        .merge(qrcodes::router(state))
        .merge(insight::router())
}

/// 完整应用：状态 + CORS、压缩、trace 和访问日志
pub fn build_app(state: &ServerState) -> Router {
    build_router(state)
        .with_state(state.clone())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(log_request))
}
