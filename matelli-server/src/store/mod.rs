//! Document store: redb tables, change notification and live subscriptions

mod document;
mod storage;
mod subscription;

pub use document::{Collection, Document};
pub use storage::{StorageError, StorageResult, Store};
pub use subscription::Subscription;
