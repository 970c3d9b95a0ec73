//! QR tracker admin handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{QrTracker, QrTrackerCreate, Visit};

/// GET /api/qrcodes - newest first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<QrTracker>>> {
    Ok(Json(state.trackers.list()?))
}

/// POST /api/qrcodes - create or reset a tracker
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<QrTrackerCreate>,
) -> AppResult<Json<QrTracker>> {
    Ok(Json(state.trackers.create(payload)?))
}

/// GET /api/qrcodes/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<QrTracker>> {
    Ok(Json(state.trackers.get(&id)?))
}

/// GET /api/qrcodes/{id}/visits - most recent first
pub async fn visits(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<Visit>>> {
    Ok(Json(state.trackers.visits(&id)?))
}

/// DELETE /api/qrcodes/{id} - tracker and its visits
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.trackers.delete(&id)?;
    Ok(Json(true))
}
