//! redb-backed document store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `meals` | `meal_id` | `Meal` JSON | Catalog |
//! | `orders` | `order_id` | `Order` JSON | Checked-out orders |
//! | `qrcodes` | `tracker_id` | `QrTracker` JSON | Scan counters |
//! | `visits` | `(tracker_id, seq)` | `Visit` JSON | Scan log per tracker |
//! | `sequence_counter` | name | `u64` | Visit sequence |
//!
//! Every mutation is one write transaction. redb serializes writers, so a
//! transaction that reads and then writes (visit counter, batch status
//! change, order id allocation) never loses a concurrent update. Committed
//! changes are announced on a broadcast channel that drives live
//! subscriptions.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::error::{AppError, ErrorCode};
use shared::models::{Order, OrderStatus, QrTracker, Visit};
use thiserror::Error;
use tokio::sync::broadcast;

use super::document::{Collection, Document};

pub(crate) const MEALS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("meals");

pub(crate) const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

pub(crate) const QRCODES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("qrcodes");

/// key = (tracker_id, seq); seq is global so visits sort by arrival
const VISITS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("visits");

const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("sequence_counter");

const VISIT_SEQ_KEY: &str = "visit_seq";

/// Capacity of the change channel; slow subscribers resync on lag
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("QR tracker not found: {0}")]
    TrackerNotFound(String),

    #[error("No free order id after {0} attempts")]
    OrderIdExhausted(usize),

    #[error("Order {order_id} is {status}")]
    UnexpectedStatus { order_id: String, status: OrderStatus },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(id) => AppError::order_not_found(id),
            StorageError::TrackerNotFound(id) => AppError::tracker_not_found(id),
            StorageError::OrderIdExhausted(attempts) => AppError::with_message(
                ErrorCode::OrderIdExhausted,
                format!("No free order id after {attempts} attempts"),
            ),
            StorageError::UnexpectedStatus { order_id, status } => AppError::with_message(
                ErrorCode::InvalidOrderStatus,
                format!("Order {order_id} is {status}, not pending purchase"),
            )
            .with_detail("order_id", order_id),
            other => AppError::database(other.to_string()),
        }
    }
}

/// Document store shared by every service
#[derive(Clone)]
pub struct Store {
    db: Arc<Database>,
    changes: broadcast::Sender<Collection>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("subscribers", &self.changes.receiver_count())
            .finish()
    }
}

impl Store {
    /// Open or create the database file, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(MEALS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(QRCODES_TABLE)?;
            let _ = write_txn.open_table(VISITS_TABLE)?;
            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(VISIT_SEQ_KEY)?.is_none() {
                seq_table.insert(VISIT_SEQ_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self {
            db: Arc::new(db),
            changes,
        })
    }

    /// Receiver of committed change notifications
    pub fn changes(&self) -> broadcast::Receiver<Collection> {
        self.changes.subscribe()
    }

    fn notify(&self, collection: Collection) {
        // No receivers is fine: nobody is watching yet
        let _ = self.changes.send(collection);
    }

    fn commit(&self, txn: WriteTransaction, collection: Collection) -> StorageResult<()> {
        txn.commit()?;
        self.notify(collection);
        Ok(())
    }

    // ========== Generic document operations ==========

    /// Full-document overwrite
    pub fn put<T: Document>(&self, doc: &T) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(T::TABLE)?;
            let value = serde_json::to_vec(doc)?;
            table.insert(doc.id(), value.as_slice())?;
        }
        self.commit(txn, T::COLLECTION)
    }

    pub fn get<T: Document>(&self, id: &str) -> StorageResult<Option<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Remove a document; `false` when it did not exist
    pub fn delete<T: Document>(&self, id: &str) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let existed = {
            let mut table = txn.open_table(T::TABLE)?;
            table.remove(id)?.is_some()
        };
        if existed {
            self.commit(txn, T::COLLECTION)?;
        } else {
            txn.abort()?;
        }
        Ok(existed)
    }

    /// All documents of a collection in the collection's query order
    pub fn list<T: Document>(&self) -> StorageResult<Vec<T>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;

        let mut docs = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            docs.push(serde_json::from_slice(value.value())?);
        }
        T::order_snapshot(&mut docs);
        Ok(docs)
    }

    pub fn count<T: Document>(&self) -> StorageResult<u64> {
        use redb::ReadableTableMetadata;
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;
        Ok(table.len()?)
    }

    // ========== Orders ==========

    /// Insert a new order under an id nobody holds yet.
    ///
    /// `draw` proposes candidate ids; each is checked and inserted inside the
    /// same write transaction, so a colliding id is re-drawn instead of
    /// overwriting an existing order.
    pub fn insert_order_with_fresh_id(
        &self,
        mut order: Order,
        mut draw: impl FnMut() -> String,
        max_attempts: usize,
    ) -> StorageResult<Order> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            let mut allocated = None;
            for _ in 0..max_attempts {
                let candidate = draw();
                if table.get(candidate.as_str())?.is_none() {
                    allocated = Some(candidate);
                    break;
                }
                tracing::debug!(order_id = %candidate, "Order id collision, drawing again");
            }
            let id = allocated.ok_or(StorageError::OrderIdExhausted(max_attempts))?;
            order.id = id;
            let value = serde_json::to_vec(&order)?;
            table.insert(order.id.as_str(), value.as_slice())?;
        }
        self.commit(txn, Collection::Orders)?;
        Ok(order)
    }

    /// Set the status of several orders in one transaction.
    ///
    /// Each order's stored status must satisfy `allowed` when the writer
    /// reads it. A missing id or a rejected status aborts the whole batch;
    /// nothing is written.
    pub fn update_orders_status(
        &self,
        order_ids: &[String],
        status: OrderStatus,
        allowed: impl Fn(OrderStatus) -> bool,
    ) -> StorageResult<Vec<Order>> {
        let txn = self.db.begin_write()?;
        let mut updated = Vec::with_capacity(order_ids.len());
        {
            let mut table = txn.open_table(ORDERS_TABLE)?;
            for id in order_ids {
                let mut order: Order = match table.get(id.as_str())? {
                    Some(value) => serde_json::from_slice(value.value())?,
                    // Dropping `txn` un-committed discards earlier updates
                    None => return Err(StorageError::OrderNotFound(id.clone())),
                };
                if !allowed(order.status) {
                    return Err(StorageError::UnexpectedStatus {
                        order_id: id.clone(),
                        status: order.status,
                    });
                }
                order.status = status;
                let value = serde_json::to_vec(&order)?;
                table.insert(id.as_str(), value.as_slice())?;
                updated.push(order);
            }
        }
        self.commit(txn, Collection::Orders)?;
        Ok(updated)
    }

    // ========== QR trackers ==========

    /// Count one scan: create the tracker if needed, bump its counter and
    /// append the visit, all in one transaction.
    pub fn record_visit(&self, tracker_id: &str, visit: &Visit) -> StorageResult<QrTracker> {
        let txn = self.db.begin_write()?;
        let tracker = {
            let mut trackers = txn.open_table(QRCODES_TABLE)?;
            let existing: Option<QrTracker> = match trackers.get(tracker_id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            let tracker = match existing {
                Some(mut t) => {
                    t.total_accesses += 1;
                    t.last_visit = Some(visit.timestamp);
                    t
                }
                None => QrTracker {
                    id: tracker_id.to_string(),
                    name: QrTracker::default_name(tracker_id),
                    total_accesses: 1,
                    created_at: visit.timestamp,
                    last_visit: Some(visit.timestamp),
                },
            };
            let value = serde_json::to_vec(&tracker)?;
            trackers.insert(tracker_id, value.as_slice())?;

            let mut seq_table = txn.open_table(SEQUENCE_TABLE)?;
            let seq = seq_table
                .get(VISIT_SEQ_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0)
                + 1;
            seq_table.insert(VISIT_SEQ_KEY, seq)?;

            let mut visits = txn.open_table(VISITS_TABLE)?;
            let value = serde_json::to_vec(visit)?;
            visits.insert((tracker_id, seq), value.as_slice())?;
            tracker
        };
        self.commit(txn, Collection::QrCodes)?;
        Ok(tracker)
    }

    /// Visits of a tracker, most recent first
    pub fn list_visits(&self, tracker_id: &str) -> StorageResult<Vec<Visit>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(VISITS_TABLE)?;

        let mut visits = Vec::new();
        for result in table.range((tracker_id, 0u64)..=(tracker_id, u64::MAX))? {
            let (_key, value) = result?;
            visits.push(serde_json::from_slice(value.value())?);
        }
        visits.reverse();
        Ok(visits)
    }

    /// Remove a tracker together with its visit log
    pub fn delete_tracker(&self, tracker_id: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut trackers = txn.open_table(QRCODES_TABLE)?;
            if trackers.remove(tracker_id)?.is_none() {
                return Err(StorageError::TrackerNotFound(tracker_id.to_string()));
            }

            let mut visits = txn.open_table(VISITS_TABLE)?;
            let mut keys = Vec::new();
            for result in visits.range((tracker_id, 0u64)..=(tracker_id, u64::MAX))? {
                let (key, _value) = result?;
                keys.push(key.value().1);
            }
            for seq in keys {
                visits.remove((tracker_id, seq))?;
            }
        }
        self.commit(txn, Collection::QrCodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use rust_decimal::Decimal;
    use shared::models::{CartState, Meal, MealCategory, OrderItems, OrderType};

    fn meal(id: &str, name: &str) -> Meal {
        Meal {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: MealCategory::Lunch,
            image: String::new(),
            tags: vec![],
            price: Decimal::new(2890, 2),
            weight: "400g".into(),
            ingredients: IndexMap::new(),
        }
    }

    fn order(id: &str, created_at: i64, status: OrderStatus) -> Order {
        Order {
            id: id.into(),
            created_at,
            order_type: OrderType::Menu,
            total: Decimal::ZERO,
            status,
            items: OrderItems::Menu(CartState::new()),
            shopping_list: IndexMap::new(),
        }
    }

    fn visit(ts: i64) -> Visit {
        Visit {
            timestamp: ts,
            user_agent: "test-agent".into(),
            language: "pt-BR".into(),
            outlink: "https://matelli.com.br".into(),
        }
    }

    #[test]
    fn test_put_get_delete() {
        let store = Store::open_in_memory().unwrap();
        store.put(&meal("l1", "Frango")).unwrap();

        let loaded: Meal = store.get("l1").unwrap().unwrap();
        assert_eq!(loaded.name, "Frango");

        assert!(store.delete::<Meal>("l1").unwrap());
        assert!(!store.delete::<Meal>("l1").unwrap());
        assert!(store.get::<Meal>("l1").unwrap().is_none());
    }

    #[test]
    fn test_list_meals_by_name() {
        let store = Store::open_in_memory().unwrap();
        store.put(&meal("a", "Sopa")).unwrap();
        store.put(&meal("b", "Omelete")).unwrap();
        store.put(&meal("c", "Quiche")).unwrap();

        let names: Vec<String> = store.list::<Meal>().unwrap().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["Omelete", "Quiche", "Sopa"]);
        assert_eq!(store.count::<Meal>().unwrap(), 3);
    }

    #[test]
    fn test_list_orders_newest_first() {
        let store = Store::open_in_memory().unwrap();
        store.put(&order("MAT-1000", 10, OrderStatus::Aprovado)).unwrap();
        store.put(&order("MAT-2000", 30, OrderStatus::Aprovado)).unwrap();
        store.put(&order("MAT-3000", 20, OrderStatus::Aprovado)).unwrap();

        let ids: Vec<String> = store.list::<Order>().unwrap().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["MAT-2000", "MAT-3000", "MAT-1000"]);
    }

    #[test]
    fn test_fresh_id_skips_existing_order() {
        let store = Store::open_in_memory().unwrap();
        store.put(&order("MAT-1111", 1, OrderStatus::Entregues)).unwrap();

        let mut candidates = vec!["MAT-2222".to_string(), "MAT-1111".to_string()];
        let inserted = store
            .insert_order_with_fresh_id(
                order("", 2, OrderStatus::Aprovado),
                || candidates.pop().unwrap(),
                5,
            )
            .unwrap();
        assert_eq!(inserted.id, "MAT-2222");

        // the old order is untouched
        let old: Order = store.get("MAT-1111").unwrap().unwrap();
        assert_eq!(old.status, OrderStatus::Entregues);
    }

    #[test]
    fn test_fresh_id_gives_up() {
        let store = Store::open_in_memory().unwrap();
        store.put(&order("MAT-1111", 1, OrderStatus::Aprovado)).unwrap();

        let err = store
            .insert_order_with_fresh_id(order("", 2, OrderStatus::Aprovado), || "MAT-1111".into(), 3)
            .unwrap_err();
        assert!(matches!(err, StorageError::OrderIdExhausted(3)));
        assert_eq!(store.count::<Order>().unwrap(), 1);
    }

    #[test]
    fn test_batch_status_is_all_or_nothing() {
        let store = Store::open_in_memory().unwrap();
        store.put(&order("MAT-1", 1, OrderStatus::Aprovado)).unwrap();
        store.put(&order("MAT-2", 2, OrderStatus::Compras)).unwrap();

        let ids = vec!["MAT-1".to_string(), "MAT-404".to_string(), "MAT-2".to_string()];
        let err = store
            .update_orders_status(&ids, OrderStatus::Produzindo, |_| true)
            .unwrap_err();
        assert!(matches!(err, StorageError::OrderNotFound(id) if id == "MAT-404"));

        let o1: Order = store.get("MAT-1").unwrap().unwrap();
        let o2: Order = store.get("MAT-2").unwrap().unwrap();
        assert_eq!(o1.status, OrderStatus::Aprovado);
        assert_eq!(o2.status, OrderStatus::Compras);

        let ids = vec!["MAT-1".to_string(), "MAT-2".to_string()];
        let updated = store
            .update_orders_status(&ids, OrderStatus::Produzindo, |_| true)
            .unwrap();
        assert_eq!(updated.len(), 2);
        assert!(
            store
                .list::<Order>()
                .unwrap()
                .iter()
                .all(|o| o.status == OrderStatus::Produzindo)
        );
    }

    #[test]
    fn test_batch_status_rechecks_status_at_write_time() {
        let store = Store::open_in_memory().unwrap();
        store.put(&order("MAT-1", 1, OrderStatus::Aprovado)).unwrap();
        store.put(&order("MAT-2", 2, OrderStatus::Compras)).unwrap();
        let ids = vec!["MAT-1".to_string(), "MAT-2".to_string()];

        // MAT-2 was delivered after the caller picked its batch
        store.put(&order("MAT-2", 2, OrderStatus::Entregues)).unwrap();

        let err = store
            .update_orders_status(&ids, OrderStatus::Produzindo, |s| s.is_active())
            .unwrap_err();
        assert!(matches!(
            &err,
            StorageError::UnexpectedStatus { order_id, status: OrderStatus::Entregues }
                if order_id == "MAT-2"
        ));
        assert_eq!(AppError::from(err).code, ErrorCode::InvalidOrderStatus);

        let o1: Order = store.get("MAT-1").unwrap().unwrap();
        let o2: Order = store.get("MAT-2").unwrap().unwrap();
        assert_eq!(o1.status, OrderStatus::Aprovado);
        assert_eq!(o2.status, OrderStatus::Entregues);
    }

    #[test]
    fn test_record_visit_creates_then_increments() {
        let store = Store::open_in_memory().unwrap();

        let first = store.record_visit("flyer", &visit(100)).unwrap();
        assert_eq!(first.total_accesses, 1);
        assert_eq!(first.name, "QR flyer");
        assert_eq!(first.created_at, 100);

        let second = store.record_visit("flyer", &visit(200)).unwrap();
        assert_eq!(second.total_accesses, 2);
        assert_eq!(second.created_at, 100);
        assert_eq!(second.last_visit, Some(200));

        let visits = store.list_visits("flyer").unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0].timestamp, 200);
    }

    #[test]
    fn test_concurrent_visits_are_not_lost() {
        let store = Store::open_in_memory().unwrap();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.record_visit("banner", &visit(i)).unwrap())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let tracker: QrTracker = store.get("banner").unwrap().unwrap();
        assert_eq!(tracker.total_accesses, 8);
        assert_eq!(store.list_visits("banner").unwrap().len(), 8);
    }

    #[test]
    fn test_delete_tracker_removes_visits() {
        let store = Store::open_in_memory().unwrap();
        store.record_visit("a", &visit(1)).unwrap();
        store.record_visit("b", &visit(2)).unwrap();
        store.record_visit("a", &visit(3)).unwrap();

        store.delete_tracker("a").unwrap();
        assert!(store.get::<QrTracker>("a").unwrap().is_none());
        assert!(store.list_visits("a").unwrap().is_empty());
        assert_eq!(store.list_visits("b").unwrap().len(), 1);

        assert!(matches!(
            store.delete_tracker("a").unwrap_err(),
            StorageError::TrackerNotFound(_)
        ));
    }

    #[test]
    fn test_commit_announces_collection() {
        let store = Store::open_in_memory().unwrap();
        let mut rx = store.changes();
        store.put(&meal("x", "X")).unwrap();
        store.record_visit("q", &visit(1)).unwrap();
        assert_eq!(rx.try_recv().unwrap(), Collection::Meals);
        assert_eq!(rx.try_recv().unwrap(), Collection::QrCodes);
    }

    #[test]
    fn test_open_on_disk_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database").join("matelli.redb");
        {
            let store = Store::open(&path).unwrap();
            store.put(&meal("d1", "Sopa")).unwrap();
        }
        let store = Store::open(&path).unwrap();
        assert_eq!(store.count::<Meal>().unwrap(), 1);
    }
}
