//! Checkout and order administration
//!
//! Checkout requests reference meals by id. They are resolved against a
//! fresh catalog read, compiled into an [`Order`] and inserted under a newly
//! allocated `MAT-####` id.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CartState, Meal, MealCategory, Order, OrderItems, OrderStatus, SelectionState, Weekday,
};
use shared::util::now_millis;

use super::catalog::CatalogService;
use super::chat::ChatLink;
use super::order_compiler::{self, draw_order_id};
use crate::aggregation;
use crate::store::Store;

/// Order id draws before giving up on a crowded id space
const MAX_ID_ATTEMPTS: usize = 32;

/// Units of one meal in a single cart line
pub const MAX_LINE_QUANTITY: u32 = 100;

/// Units across the whole cart
pub const MAX_CART_UNITS: u64 = 500;

fn default_quantity() -> u32 {
    1
}

/// One cart line of a menu checkout
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub meal_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Checkout payload
///
/// ```json
/// { "type": "kit", "selection": { "Segunda": { "Almoço": "l1" } } }
/// { "type": "menu", "items": [ { "mealId": "l2", "quantity": 2 } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CheckoutRequest {
    Kit {
        selection: BTreeMap<Weekday, BTreeMap<MealCategory, String>>,
    },
    Menu {
        items: Vec<CartLine>,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order: Order,
    pub summary: String,
    pub chat_link: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPreview {
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub selected_slots: usize,
    pub item_count: u64,
    pub summary: String,
    pub chat_link: String,
}

#[derive(Clone, Debug)]
pub struct OrderService {
    store: Store,
    catalog: CatalogService,
    chat: ChatLink,
}

impl OrderService {
    pub fn new(store: Store, catalog: CatalogService, chat: ChatLink) -> Self {
        Self {
            store,
            catalog,
            chat,
        }
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Resolve meal references against the current catalog.
    ///
    /// Ids missing from the catalog are dropped.
    pub fn resolve(&self, request: CheckoutRequest) -> AppResult<OrderItems> {
        let catalog = self.catalog.snapshot()?;
        resolve_against(&catalog, request)
    }

    /// Compile, persist and hand off an order
    pub fn checkout(&self, request: CheckoutRequest) -> AppResult<CheckoutResponse> {
        let items = self.resolve(request)?;
        ensure_orderable(&items)?;

        let draft = order_compiler::compile(items, now_millis());
        let mut rng = rand::thread_rng();
        let order = self
            .store
            .insert_order_with_fresh_id(draft, || draw_order_id(&mut rng), MAX_ID_ATTEMPTS)
            .inspect_err(|e| tracing::error!(error = %e, "Failed to persist order"))?;

        let summary =
            order_compiler::compose_summary_text(&order.items, order.total, Some(&order.id));
        let chat_link = self.chat.link(&summary);

        tracing::info!(
            order_id = %order.id,
            order_type = ?order.order_type,
            total = %order.total,
            "Order placed"
        );
        Ok(CheckoutResponse {
            order,
            summary,
            chat_link,
        })
    }

    /// Summary and link for the current selection, without persisting.
    /// Incomplete kits are allowed.
    pub fn preview(&self, request: CheckoutRequest) -> AppResult<CheckoutPreview> {
        let items = self.resolve(request)?;
        let (selected_slots, item_count) = match &items {
            OrderItems::Kit(selection) => (aggregation::count_selected_slots(selection), 0),
            OrderItems::Menu(cart) => (0, aggregation::cart_item_count(cart)),
        };
        if selected_slots == 0 && item_count == 0 {
            return Err(AppError::new(ErrorCode::OrderEmpty));
        }

        let total = order_compiler::order_total(&items);
        let summary = order_compiler::compose_summary_text(&items, total, None);
        let chat_link = self.chat.link(&summary);
        Ok(CheckoutPreview {
            total,
            selected_slots,
            item_count,
            summary,
            chat_link,
        })
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Newest first, optionally limited to one status
    pub fn list(&self, status: Option<OrderStatus>) -> AppResult<Vec<Order>> {
        let orders = self.store.list::<Order>()?;
        Ok(match status {
            Some(status) => orders.into_iter().filter(|o| o.status == status).collect(),
            None => orders,
        })
    }

    pub fn get(&self, id: &str) -> AppResult<Order> {
        self.store
            .get::<Order>(id)?
            .ok_or_else(|| AppError::order_not_found(id))
    }

    pub fn update_status(&self, id: &str, status: OrderStatus) -> AppResult<Order> {
        let mut updated = self.store.update_orders_status(&[id.to_string()], status, |_| true)?;
        let order = updated
            .pop()
            .ok_or_else(|| AppError::order_not_found(id))?;
        tracing::info!(order_id = %id, status = %status, "Order status changed");
        Ok(order)
    }

    pub fn delete(&self, id: &str) -> AppResult<()> {
        if !self.store.delete::<Order>(id)? {
            return Err(AppError::order_not_found(id));
        }
        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// Summary and chat link of a stored order
    pub fn summary(&self, id: &str) -> AppResult<(String, String)> {
        let order = self.get(id)?;
        let summary =
            order_compiler::compose_summary_text(&order.items, order.total, Some(&order.id));
        let link = self.chat.link(&summary);
        Ok((summary, link))
    }
}

fn resolve_against(
    catalog: &IndexMap<String, Meal>,
    request: CheckoutRequest,
) -> AppResult<OrderItems> {
    match request {
        CheckoutRequest::Kit { selection } => {
            let mut state = SelectionState::new();
            for (day, slots) in selection {
                for (category, meal_id) in slots {
                    let Some(meal) = catalog.get(&meal_id) else {
                        tracing::warn!(meal_id = %meal_id, day = %day, "Dropping meal missing from catalog");
                        continue;
                    };
                    state.select(day, category, meal.clone())?;
                }
            }
            Ok(OrderItems::Kit(state))
        }
        CheckoutRequest::Menu { items } => {
            let mut cart = CartState::new();
            for line in items {
                if line.quantity > MAX_LINE_QUANTITY {
                    return Err(AppError::with_message(
                        ErrorCode::ValueOutOfRange,
                        format!(
                            "quantity {} exceeds the per-line limit of {MAX_LINE_QUANTITY}",
                            line.quantity
                        ),
                    )
                    .with_detail("meal_id", line.meal_id));
                }
                let Some(meal) = catalog.get(&line.meal_id) else {
                    tracing::warn!(meal_id = %line.meal_id, "Dropping meal missing from catalog");
                    continue;
                };
                cart.add(meal.clone(), line.quantity);
                let units = aggregation::cart_item_count(&cart);
                if units > MAX_CART_UNITS {
                    return Err(AppError::with_message(
                        ErrorCode::ValueOutOfRange,
                        format!("cart holds {units} units, the limit is {MAX_CART_UNITS}"),
                    )
                    .with_detail("units", units));
                }
            }
            Ok(OrderItems::Menu(cart))
        }
    }
}

/// Kits must fill every slot, carts must hold something
fn ensure_orderable(items: &OrderItems) -> AppResult<()> {
    match items {
        OrderItems::Kit(selection) if !aggregation::is_kit_complete(selection) => {
            let selected = aggregation::count_selected_slots(selection);
            Err(AppError::with_message(
                ErrorCode::KitIncomplete,
                format!("Kit has {selected} of 35 meals"),
            )
            .with_detail("selected", selected))
        }
        OrderItems::Menu(cart) if cart.is_empty() => Err(AppError::new(ErrorCode::OrderEmpty)),
        _ => Ok(()),
    }
}
