use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::services::CheckoutRequest;
use crate::utils::{AppError, AppResult};
use shared::models::{MealCategory, OrderItems, Weekday};

/// Either meal names per day, or a kit selection by meal id
///
/// ```json
/// { "days": { "Segunda": ["Tapioca de Ovos e Queijo", "Tropical Mango"] } }
/// { "selection": { "Segunda": { "Almoço": "l1" } } }
/// ```
#[derive(Debug, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub days: Option<BTreeMap<Weekday, Vec<String>>>,
    #[serde(default)]
    pub selection: Option<BTreeMap<Weekday, BTreeMap<MealCategory, String>>>,
}

#[derive(Debug, Serialize)]
pub struct InsightResponse {
    pub insight: String,
}

/// POST /api/insight
pub async fn insight(
    State(state): State<ServerState>,
    Json(req): Json<InsightRequest>,
) -> AppResult<Json<InsightResponse>> {
    let days = match (req.days, req.selection) {
        (Some(days), _) => days,
        (None, Some(selection)) => match state.orders.resolve(CheckoutRequest::Kit { selection })? {
            OrderItems::Kit(kit) => kit.meal_names_by_day(),
            OrderItems::Menu(_) => BTreeMap::new(),
        },
        (None, None) => {
            return Err(AppError::invalid_request("Either days or selection is required"));
        }
    };

    let insight = state.insight.insight(&days).await;
    Ok(Json(InsightResponse { insight }))
}
