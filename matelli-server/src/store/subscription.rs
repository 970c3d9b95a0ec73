//! Live collection subscriptions
//!
//! A subscription delivers the full, ordered contents of one collection:
//! once on start and again after every committed change to it. Dropping the
//! returned [`Subscription`] stops delivery.

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::document::Document;
use super::storage::Store;

/// Handle of a running subscription; unsubscribes on drop
#[derive(Debug)]
pub struct Subscription {
    id: Uuid,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop delivery and wait for the listener task to exit
    pub async fn unsubscribe(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl Store {
    /// Watch collection `T`, calling `on_snapshot` with every new listing.
    ///
    /// Read failures are logged and the previous snapshot stays current.
    /// A lagging receiver simply re-reads; only the latest state matters.
    pub fn subscribe<T, F>(&self, on_snapshot: F) -> Subscription
    where
        T: Document,
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let store = self.clone();
        // Subscribe before the first read so no commit slips in between
        let mut changes = self.changes();

        let handle = tokio::spawn(async move {
            let deliver = |store: &Store| match store.list::<T>() {
                Ok(docs) => on_snapshot(docs),
                Err(e) => tracing::error!(
                    subscription_id = %id,
                    collection = %T::COLLECTION,
                    error = %e,
                    "Snapshot read failed"
                ),
            };

            deliver(&store);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    received = changes.recv() => match received {
                        Ok(collection) if collection == T::COLLECTION => deliver(&store),
                        Ok(_) => {}
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!(subscription_id = %id, skipped, "Subscriber lagged, resyncing");
                            deliver(&store);
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            tracing::debug!(subscription_id = %id, collection = %T::COLLECTION, "Subscription closed");
        });

        tracing::debug!(subscription_id = %id, collection = %T::COLLECTION, "Subscription started");
        Subscription {
            id,
            cancel,
            handle: Some(handle),
        }
    }
}
