//! Collections and the documents stored in them

use std::fmt;

use redb::TableDefinition;
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::models::{Meal, Order, QrTracker};

use super::storage::{MEALS_TABLE, ORDERS_TABLE, QRCODES_TABLE};

/// Named collection, the unit of change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Meals,
    Orders,
    QrCodes,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collection::Meals => "meals",
            Collection::Orders => "orders",
            Collection::QrCodes => "qrcodes",
        })
    }
}

/// A JSON document keyed by a string id
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]>;
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    /// Sort a full listing into the collection's query order
    fn order_snapshot(_docs: &mut [Self]) {}
}

impl Document for Meal {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = MEALS_TABLE;
    const COLLECTION: Collection = Collection::Meals;

    fn id(&self) -> &str {
        &self.id
    }

    fn order_snapshot(docs: &mut [Self]) {
        docs.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    }
}

impl Document for Order {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = ORDERS_TABLE;
    const COLLECTION: Collection = Collection::Orders;

    fn id(&self) -> &str {
        &self.id
    }

    /// Newest first
    fn order_snapshot(docs: &mut [Self]) {
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    }
}

impl Document for QrTracker {
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = QRCODES_TABLE;
    const COLLECTION: Collection = Collection::QrCodes;

    fn id(&self) -> &str {
        &self.id
    }

    /// Newest first
    fn order_snapshot(docs: &mut [Self]) {
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    }
}
