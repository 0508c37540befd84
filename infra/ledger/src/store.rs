//! Persistence seam of the ledger.
//!
//! The ledger never owns durability: it talks to a [`PersistenceStore`] by composite key and
//! leaves transactional guarantees of the medium to the store. [`MemoryStore`] is the bundled
//! implementation used by tests and single-process deployments.

use crate::error::LedgerError;
use chub_domain::records::{LedgerKey, Record, RecordKind};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::fmt::Debug;

/// A record together with the ledger-assigned insertion sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub seq: u64,
    pub record: Record,
}

/// Key/value contract the ledger persists through.
///
/// `put` is an upsert; uniqueness is enforced by the ledger, not by the store.
pub trait PersistenceStore: Debug + Send + Sync {
    /// # Errors
    /// Returns [`LedgerError::Store`] if the medium cannot be read.
    fn get(&self, key: &LedgerKey) -> Result<Option<StoredEntry>, LedgerError>;

    /// # Errors
    /// Returns [`LedgerError::Store`] if the medium cannot be written.
    fn put(&self, key: LedgerKey, entry: StoredEntry) -> Result<(), LedgerError>;

    /// # Errors
    /// Returns [`LedgerError::Store`] if the medium cannot be written.
    fn delete(&self, key: &LedgerKey) -> Result<Option<StoredEntry>, LedgerError>;

    /// Every entry of one kind, in no particular order.
    ///
    /// # Errors
    /// Returns [`LedgerError::Store`] if the medium cannot be read.
    fn list(&self, kind: RecordKind) -> Result<Vec<StoredEntry>, LedgerError>;
}

/// In-process store partitioned by record kind.
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: RwLock<FxHashMap<RecordKind, FxHashMap<LedgerKey, StoredEntry>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partitions.read().values().map(FxHashMap::len).sum()
    }
}

impl PersistenceStore for MemoryStore {
    fn get(&self, key: &LedgerKey) -> Result<Option<StoredEntry>, LedgerError> {
        Ok(self.partitions.read().get(&key.kind).and_then(|p| p.get(key)).cloned())
    }

    fn put(&self, key: LedgerKey, entry: StoredEntry) -> Result<(), LedgerError> {
        self.partitions.write().entry(key.kind).or_default().insert(key, entry);
        Ok(())
    }

    fn delete(&self, key: &LedgerKey) -> Result<Option<StoredEntry>, LedgerError> {
        Ok(self.partitions.write().get_mut(&key.kind).and_then(|p| p.remove(key)))
    }

    fn list(&self, kind: RecordKind) -> Result<Vec<StoredEntry>, LedgerError> {
        Ok(self
            .partitions
            .read()
            .get(&kind)
            .map(|p| p.values().cloned().collect())
            .unwrap_or_default())
    }
}
