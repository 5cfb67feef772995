//! In-process document store.
//!
//! Reference implementation of [`DocumentStore`] over a mutex-guarded
//! map, with one `tokio::sync::watch` channel per document carrying the
//! latest accepted write to subscribers. Revisions count accepted writes;
//! timestamps are stamped here, standing in for the production store's
//! server-assigned times.

use super::{DocumentStore, DocumentWatch, StoreError, Versioned};
use crate::record::GameSessionRecord;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, instrument};
use uuid::Uuid;

struct Entry {
    // The channel owns the current Versioned snapshot; reads borrow it,
    // writes send_replace through it.
    tx: watch::Sender<Versioned>,
}

/// Shared in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory document store");
        Self::default()
    }

    /// Number of live subscriptions on a document. Zero for unknown ids.
    pub fn subscriber_count(&self, id: &str) -> usize {
        let documents = self.lock();
        documents
            .get(id)
            .map(|entry| entry.tx.receiver_count())
            .unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        // Lock poisoning only happens if a writer panicked; the map itself
        // is still consistent because every write is a single send_replace.
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let documents = self.lock();
        f.debug_struct("MemoryStore")
            .field("documents", &documents.len())
            .finish()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Versioned, StoreError> {
        let documents = self.lock();
        let entry = documents
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(entry.tx.borrow().clone())
    }

    #[instrument(skip(self, record))]
    async fn insert(&self, mut record: GameSessionRecord) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        record.stamp_created(Utc::now());

        let (tx, _rx) = watch::channel(Versioned::new(1, record));
        let mut documents = self.lock();
        documents.insert(id.clone(), Entry { tx });

        info!(document_id = %id, "Document inserted");
        Ok(id)
    }

    #[instrument(skip(self, record))]
    async fn put(&self, id: &str, mut record: GameSessionRecord) -> Result<u64, StoreError> {
        let documents = self.lock();
        let entry = documents
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        record.touch(Utc::now());
        let revision = entry.tx.borrow().revision() + 1;
        entry.tx.send_replace(Versioned::new(revision, record));

        debug!(document_id = id, revision, "Document replaced");
        Ok(revision)
    }

    #[instrument(skip(self, record))]
    async fn update(
        &self,
        id: &str,
        expected: u64,
        mut record: GameSessionRecord,
    ) -> Result<u64, StoreError> {
        let documents = self.lock();
        let entry = documents
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let actual = *entry.tx.borrow().revision();
        if actual != expected {
            debug!(document_id = id, expected, actual, "Conditional write rejected");
            return Err(StoreError::Conflict { expected, actual });
        }

        record.touch(Utc::now());
        let revision = actual + 1;
        entry.tx.send_replace(Versioned::new(revision, record));

        debug!(document_id = id, revision, "Document updated");
        Ok(revision)
    }

    #[instrument(skip(self))]
    async fn watch(&self, id: &str) -> Result<DocumentWatch, StoreError> {
        let documents = self.lock();
        let entry = documents
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        debug!(document_id = id, "Subscription opened");
        Ok(DocumentWatch::new(entry.tx.subscribe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GameSessionRecord {
        GameSessionRecord::waiting("alice")
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = MemoryStore::new();
        let id = store.insert(record()).await.expect("insert");

        let doc = store.get(&id).await.expect("get");
        assert_eq!(*doc.revision(), 1);
        assert_eq!(doc.record().created_by(), "alice");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get("nope").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_conditional_update_rejects_stale_revision() {
        let store = MemoryStore::new();
        let id = store.insert(record()).await.expect("insert");

        let rev = store
            .put(&id, record().claim_o_seat("bob"))
            .await
            .expect("put");
        assert_eq!(rev, 2);

        // A writer still holding revision 1 must be rejected.
        let err = store
            .update(&id, 1, record())
            .await
            .expect_err("stale write");
        assert_eq!(
            err,
            StoreError::Conflict {
                expected: 1,
                actual: 2
            }
        );

        // The rejected write left the document untouched.
        let doc = store.get(&id).await.expect("get");
        assert_eq!(*doc.revision(), 2);
        assert!(doc.record().status().is_active());
    }

    #[tokio::test]
    async fn test_watch_pushes_latest_write() {
        let store = MemoryStore::new();
        let id = store.insert(record()).await.expect("insert");

        let mut watch = store.watch(&id).await.expect("watch");
        assert_eq!(*watch.current().revision(), 1);

        store
            .put(&id, record().claim_o_seat("bob"))
            .await
            .expect("put");

        let pushed = watch.changed().await.expect("changed");
        assert_eq!(*pushed.revision(), 2);
        assert!(pushed.record().status().is_active());
    }

    #[tokio::test]
    async fn test_dropping_watch_releases_subscription() {
        let store = MemoryStore::new();
        let id = store.insert(record()).await.expect("insert");

        let watch = store.watch(&id).await.expect("watch");
        assert_eq!(store.subscriber_count(&id), 1);

        drop(watch);
        assert_eq!(store.subscriber_count(&id), 0);
    }
}
