//! Meal API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::services::SeedReport;
use crate::services::default_menu::default_menu;
use crate::utils::{AppError, AppResult};
use shared::models::{Meal, MealDraft};

/// GET /api/meals - catalog ordered by name
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Meal>>> {
    Ok(Json(state.catalog.list()?))
}

/// GET /api/meals/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Meal>> {
    Ok(Json(state.catalog.get(&id)?))
}

/// POST /api/meals - create or overwrite
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MealDraft>,
) -> AppResult<Json<Meal>> {
    Ok(Json(state.catalog.save(payload)?))
}

/// PUT /api/meals/{id} - full overwrite; the body id may be omitted
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut payload): Json<MealDraft>,
) -> AppResult<Json<Meal>> {
    if payload.id.is_empty() {
        payload.id = id.clone();
    } else if payload.id != id {
        return Err(AppError::validation(format!(
            "Body id {} does not match path id {}",
            payload.id, id
        ))
        .with_detail("meal_id", id));
    }
    Ok(Json(state.catalog.save(payload)?))
}

/// DELETE /api/meals/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.catalog.delete(&id)?;
    Ok(Json(true))
}

/// POST /api/meals/seed - write a batch of meals
pub async fn seed(
    State(state): State<ServerState>,
    Json(meals): Json<Vec<MealDraft>>,
) -> AppResult<Json<SeedReport>> {
    Ok(Json(state.catalog.seed(meals).await?))
}

/// POST /api/meals/seed/default - write the built-in menu
pub async fn seed_default(State(state): State<ServerState>) -> AppResult<Json<SeedReport>> {
    Ok(Json(state.catalog.seed(default_menu()).await?))
}
