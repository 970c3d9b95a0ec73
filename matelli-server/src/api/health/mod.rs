//! 健康检查路由
//!
//! # 路由列表
//!
//! | 路径 | 方法 | 说明 | 认证 |
//! |------|------|------|------|
//! | /health | GET | 服务状态和文档计数 | 无 |
//!
//! ```json
//! { "status": "ok", "version": "0.1.0", "meals": 11, "orders": 3 }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{Meal, Order};

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    meals: u64,
    orders: u64,
}

/// 统计文档数量，顺便检查数据库可读
async fn health(State(state): State<ServerState>) -> AppResult<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        meals: state.store.count::<Meal>()?,
        orders: state.store.count::<Order>()?,
    }))
}
