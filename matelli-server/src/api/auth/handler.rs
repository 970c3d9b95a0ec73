use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::passphrase_matches;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub passphrase: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<()>> {
    if !passphrase_matches(&state.config.admin_passphrase, &req.passphrase) {
        tracing::warn!(target: "security", "Admin login failed");
        return Err(AppError::invalid_credentials());
    }
    tracing::info!(target: "security", "Admin login");
    Ok(ApiResponse::ok())
}
