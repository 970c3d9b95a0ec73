//! Order Model

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::selection::{CartState, SelectionState};
use crate::error::{AppError, ErrorCode};

/// Ingredient -> one measure per meal instance, first-appearance order
pub type ShoppingList = IndexMap<String, Vec<String>>;

/// Order lifecycle status
///
/// Conventional flow is `feito -> aprovado -> compras -> produzindo ->
/// entregues -> avaliados`, with `esperando` on the side. Transitions are
/// not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Feito,
    Aprovado,
    Compras,
    Produzindo,
    Entregues,
    Avaliados,
    Esperando,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Feito,
        OrderStatus::Aprovado,
        OrderStatus::Compras,
        OrderStatus::Produzindo,
        OrderStatus::Entregues,
        OrderStatus::Avaliados,
        OrderStatus::Esperando,
    ];

    /// Status given to a freshly checked-out order
    pub const INITIAL: OrderStatus = OrderStatus::Aprovado;

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Feito => "feito",
            OrderStatus::Aprovado => "aprovado",
            OrderStatus::Compras => "compras",
            OrderStatus::Produzindo => "produzindo",
            OrderStatus::Entregues => "entregues",
            OrderStatus::Avaliados => "avaliados",
            OrderStatus::Esperando => "esperando",
        }
    }

    /// Pending purchase: counted by the consolidated shopping list
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Aprovado | OrderStatus::Compras)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                AppError::with_message(
                    ErrorCode::InvalidOrderStatus,
                    format!("unknown order status: {s}"),
                )
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Kit,
    Menu,
}

/// Snapshot of what was ordered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderItems {
    Kit(SelectionState),
    Menu(CartState),
}

impl OrderItems {
    pub fn order_type(&self) -> OrderType {
        match self {
            OrderItems::Kit(_) => OrderType::Kit,
            OrderItems::Menu(_) => OrderType::Menu,
        }
    }
}

/// Persisted order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// `MAT-####`
    pub id: String,
    /// Unix millis
    pub created_at: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub items: OrderItems,
    #[serde(default)]
    pub shopping_list: ShoppingList,
}
