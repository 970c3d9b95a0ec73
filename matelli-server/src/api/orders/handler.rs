//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::services::{CheckoutPreview, CheckoutRequest, CheckoutResponse};
use crate::utils::AppResult;
use shared::models::{Order, OrderStatus};

/// POST /api/checkout - place an order and get the chat hand-off
pub async fn checkout(
    State(state): State<ServerState>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutResponse>> {
    Ok(Json(state.orders.checkout(request)?))
}

/// POST /api/checkout/preview - summary and link without placing the order
pub async fn preview(
    State(state): State<ServerState>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<CheckoutPreview>> {
    Ok(Json(state.orders.preview(request)?))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// GET /api/orders?status=aprovado - newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()?;
    Ok(Json(state.orders.list(status)?))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.get(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// PUT /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.update_status(&id, payload.status)?))
}

/// DELETE /api/orders/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    state.orders.delete(&id)?;
    Ok(Json(true))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub summary: String,
    pub chat_link: String,
}

/// GET /api/orders/{id}/summary - re-send the hand-off message
pub async fn summary(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OrderSummary>> {
    let (summary, chat_link) = state.orders.summary(&id)?;
    Ok(Json(OrderSummary { summary, chat_link }))
}
