//! Consolidated shopping list across active orders
//!
//! The view is recomputed in full from every orders snapshot delivered by a
//! live subscription; the API only ever reads the latest result.

use std::fmt::Write;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Order, OrderStatus};
use tokio_util::sync::CancellationToken;

use crate::store::{Store, Subscription};

/// Status an order moves to once its ingredients are bought
pub const PURCHASED_STATUS: OrderStatus = OrderStatus::Produzindo;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedItem {
    pub measures: Vec<String>,
    /// Each contributing order once, in encounter order
    pub order_ids: Vec<String>,
}

pub type ConsolidatedList = IndexMap<String, ConsolidatedItem>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingView {
    /// Active orders in listing order
    pub order_ids: Vec<String>,
    pub items: ConsolidatedList,
}

/// Fold the shopping lists of active orders into one ingredient map
pub fn consolidate(orders: &[Order]) -> ConsolidatedList {
    let mut list = ConsolidatedList::new();
    for order in orders.iter().filter(|o| o.status.is_active()) {
        for (ingredient, measures) in &order.shopping_list {
            let entry = list.entry(ingredient.clone()).or_default();
            entry.measures.extend(measures.iter().cloned());
            if !entry.order_ids.contains(&order.id) {
                entry.order_ids.push(order.id.clone());
            }
        }
    }
    list
}

pub fn build_view(orders: &[Order]) -> ShoppingView {
    ShoppingView {
        order_ids: orders
            .iter()
            .filter(|o| o.status.is_active())
            .map(|o| o.id.clone())
            .collect(),
        items: consolidate(orders),
    }
}

/// Message body for sending the list through the chat hand-off
pub fn to_chat_text(view: &ShoppingView) -> String {
    let mut text = String::from("*🛒 LISTA DE COMPRAS*\n");
    if view.order_ids.is_empty() {
        text.push_str("\nNenhum pedido ativo.");
        return text;
    }

    let _ = writeln!(text, "*Pedidos: {}*", view.order_ids.join(", "));
    text.push('\n');
    for (ingredient, item) in &view.items {
        let _ = writeln!(text, "- {}: {}", ingredient, item.measures.join(" + "));
    }
    text
}

#[derive(Clone)]
pub struct ShoppingService {
    store: Store,
    view: Arc<RwLock<ShoppingView>>,
}

impl std::fmt::Debug for ShoppingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let view = self.view.read();
        f.debug_struct("ShoppingService")
            .field("active_orders", &view.order_ids.len())
            .field("ingredients", &view.items.len())
            .finish()
    }
}

impl ShoppingService {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            view: Arc::new(RwLock::new(ShoppingView::default())),
        }
    }

    /// Latest consolidated view
    pub fn view(&self) -> ShoppingView {
        self.view.read().clone()
    }

    fn replace(&self, orders: &[Order]) {
        let view = build_view(orders);
        tracing::debug!(
            active_orders = view.order_ids.len(),
            ingredients = view.items.len(),
            "Shopping list recomputed"
        );
        *self.view.write() = view;
    }

    /// Recompute the view on every orders snapshot
    pub fn watch(&self) -> Subscription {
        let service = self.clone();
        self.store
            .subscribe::<Order, _>(move |orders| service.replace(&orders))
    }

    /// Keep the view live until `shutdown` fires
    pub async fn run(self, shutdown: CancellationToken) {
        let subscription = self.watch();
        shutdown.cancelled().await;
        subscription.unsubscribe().await;
    }

    /// Move active orders to [`PURCHASED_STATUS`] in one batch.
    ///
    /// Without ids, the whole current active set is moved. Any id that is not
    /// an active order rejects the batch before anything is written. Status is
    /// checked again inside the write transaction, so an order that left the
    /// active set after the listing aborts the batch instead of being moved.
    pub fn mark_purchased(&self, order_ids: Option<Vec<String>>) -> AppResult<Vec<Order>> {
        let orders = self.store.list::<Order>()?;
        let active: Vec<String> = orders
            .iter()
            .filter(|o| o.status.is_active())
            .map(|o| o.id.clone())
            .collect();

        let batch = match order_ids {
            None => active,
            Some(ids) => {
                for id in &ids {
                    match orders.iter().find(|o| &o.id == id) {
                        None => return Err(AppError::order_not_found(id.as_str())),
                        Some(order) if !order.status.is_active() => {
                            return Err(AppError::with_message(
                                ErrorCode::InvalidOrderStatus,
                                format!("Order {} is {}, not pending purchase", id, order.status),
                            )
                            .with_detail("order_id", id.as_str()));
                        }
                        Some(_) => {}
                    }
                }
                ids
            }
        };

        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let updated = self
            .store
            .update_orders_status(&batch, PURCHASED_STATUS, |s| s.is_active())
            .inspect_err(|e| tracing::error!(error = %e, "Purchase batch aborted"))?;
        tracing::info!(orders = ?batch, "Orders marked as purchased");
        Ok(updated)
    }
}
