use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::services::ShoppingView;
use crate::services::shopping::to_chat_text;
use crate::utils::AppResult;
use shared::models::Order;

/// GET /api/shopping-list - latest consolidated view
pub async fn view(State(state): State<ServerState>) -> Json<ShoppingView> {
    Json(state.shopping.view())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub text: String,
    pub chat_link: String,
}

/// GET /api/shopping-list/share - list as a chat message
pub async fn share(State(state): State<ServerState>) -> Json<ShareResponse> {
    let text = to_chat_text(&state.shopping.view());
    let chat_link = state.chat.link(&text);
    Json(ShareResponse { text, chat_link })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Restrict the batch; all active orders when absent
    #[serde(default)]
    pub order_ids: Option<Vec<String>>,
}

/// POST /api/shopping-list/purchased - move active orders to `produzindo`
pub async fn mark_purchased(
    State(state): State<ServerState>,
    Json(req): Json<PurchaseRequest>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(state.shopping.mark_purchased(req.order_ids)?))
}
