//! Document store seam.
//!
//! The session protocol only needs four things from its backing store:
//! point reads, whole-document writes (unconditional and conditional),
//! and a per-document change subscription that pushes the latest accepted
//! write to every subscriber. Anything offering those semantics can stand
//! behind [`DocumentStore`]; [`MemoryStore`] is the in-process reference
//! used by the demo binary and the test suite.

mod memory;

pub use memory::MemoryStore;

use crate::record::GameSessionRecord;
use async_trait::async_trait;
use derive_getters::Getters;
use derive_new::new;
use tokio::sync::watch;

/// A record paired with the store revision that produced it.
///
/// Revisions increase by one on every accepted write and serve as the
/// optimistic-concurrency token for [`DocumentStore::update`].
#[derive(Debug, Clone, Getters, new)]
pub struct Versioned {
    /// Store revision of this snapshot.
    revision: u64,
    /// The record at that revision.
    record: GameSessionRecord,
}

/// Store for shared session documents.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Reads the current snapshot of a document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for a missing document, or
    /// [`StoreError::Transport`] if the backend is unreachable.
    async fn get(&self, id: &str) -> Result<Versioned, StoreError>;

    /// Inserts a new document and returns its store-assigned id.
    async fn insert(&self, record: GameSessionRecord) -> Result<String, StoreError>;

    /// Replaces a document unconditionally (last writer wins) and returns
    /// the new revision.
    async fn put(&self, id: &str, record: GameSessionRecord) -> Result<u64, StoreError>;

    /// Replaces a document only if its revision still equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when another write was accepted
    /// since the snapshot `expected` was read; no write is applied.
    async fn update(
        &self,
        id: &str,
        expected: u64,
        record: GameSessionRecord,
    ) -> Result<u64, StoreError>;

    /// Subscribes to a document's changes.
    ///
    /// The returned watch immediately exposes the current snapshot and
    /// then pushes every subsequently accepted write (subscribers that
    /// fall behind see the latest state, not each intermediate one).
    /// Dropping the watch tears the subscription down; no further pushes
    /// are delivered.
    async fn watch(&self, id: &str) -> Result<DocumentWatch, StoreError>;
}

/// A live subscription to one document.
#[derive(Debug)]
pub struct DocumentWatch {
    rx: watch::Receiver<Versioned>,
}

impl DocumentWatch {
    pub(crate) fn new(rx: watch::Receiver<Versioned>) -> Self {
        Self { rx }
    }

    /// The latest pushed snapshot. Always authoritative; clients must
    /// re-derive any cached view from it.
    pub fn current(&self) -> Versioned {
        self.rx.borrow().clone()
    }

    /// Waits for the next accepted write and returns the snapshot it
    /// produced.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SubscriptionClosed`] if the document's
    /// channel has gone away (store dropped).
    pub async fn changed(&mut self) -> Result<Versioned, StoreError> {
        self.rx
            .changed()
            .await
            .map_err(|_| StoreError::SubscriptionClosed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}

/// Store failure taxonomy.
///
/// `NotFound` surfaces as a terminal "game not found" state; `Conflict`
/// means the caller's snapshot went stale and the write was rejected;
/// `Transport` covers backend I/O failures, reported to the user and not
/// retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum StoreError {
    /// No document with the given id.
    #[display("document '{}' not found", _0)]
    NotFound(String),

    /// Conditional write rejected: the stored revision moved.
    #[display("revision conflict: expected {}, found {}", expected, actual)]
    Conflict {
        /// Revision the writer computed against.
        expected: u64,
        /// Revision actually stored.
        actual: u64,
    },

    /// The backend could not be reached or rejected the request.
    #[display("store transport failure: {}", _0)]
    Transport(String),

    /// The subscription's document channel has gone away.
    #[display("subscription closed")]
    SubscriptionClosed,
}

impl std::error::Error for StoreError {}
