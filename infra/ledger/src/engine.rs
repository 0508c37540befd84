//! Core ledger implementation.
//!
//! The [`Ledger`] handle indexes records by [`LedgerKey`] and turns every mutation into an
//! atomic check-and-act on that key: the key is owned for the whole closure passed to
//! [`Ledger::transaction`], so a duplicate check, a rule chain and the write that follows can
//! never interleave with another writer of the same key.

use crate::builder::LedgerBuilder;
use crate::error::LedgerError;
use crate::locks::KeyLocks;
use crate::store::{PersistenceStore, StoredEntry};
use chub_domain::records::{LedgerKey, PurchaseRecord, PurchaseStatus, Record, RecordKind};
use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// The internal shared state of a [`Ledger`] instance.
#[derive(Debug)]
pub struct LedgerInner {
    pub(crate) store: Arc<dyn PersistenceStore>,
    pub(crate) locks: KeyLocks,
    /// Last insertion sequence handed out.
    pub(crate) sequence: AtomicU64,
}

/// A thread-safe handle to the interaction ledger.
///
/// Cloning is cheap: clones share the store, the key registry and the sequence.
///
/// # Example
///
/// ```rust
/// use chub_domain::records::{BookmarkRecord, Record, RecordKind};
/// use chub_ledger::{Ledger, LedgerError};
///
/// # fn main() -> Result<(), LedgerError> {
/// let ledger = Ledger::in_memory();
/// ledger.put(Record::Bookmark(BookmarkRecord {
///     principal: "user@example.com".to_owned(),
///     course: "course-1".to_owned(),
///     created_at: chrono::Utc::now(),
/// }))?;
///
/// assert!(ledger.exists(RecordKind::Bookmark, "user@example.com", "course-1")?);
/// assert_eq!(ledger.count_by_resource(RecordKind::Bookmark, "course-1")?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    pub(crate) inner: Arc<LedgerInner>,
}

impl Deref for Ledger {
    type Target = LedgerInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Ledger {
    #[must_use = "The ledger is not opened until you call .open()"]
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::new()
    }

    /// An empty ledger over a fresh [`crate::MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_parts(Arc::new(crate::MemoryStore::new()), 0)
    }

    pub(crate) fn from_parts(store: Arc<dyn PersistenceStore>, last_seq: u64) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                store,
                locks: KeyLocks::default(),
                sequence: AtomicU64::new(last_seq),
            }),
        }
    }

    /// Looks up the record stored under `key`.
    ///
    /// # Errors
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub fn get(&self, key: &LedgerKey) -> Result<Option<Record>, LedgerError> {
        Ok(self.store.get(key)?.map(|entry| entry.record))
    }

    /// # Errors
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub fn exists(
        &self,
        kind: RecordKind,
        principal: &str,
        resource: &str,
    ) -> Result<bool, LedgerError> {
        Ok(self.store.get(&LedgerKey::new(kind, principal, resource))?.is_some())
    }

    /// Inserts a record under its own key.
    ///
    /// # Errors
    /// Returns [`LedgerError::Duplicate`] if the key is taken. An active purchase may replace a
    /// refunded one; every other collision is a duplicate.
    pub fn put(&self, record: Record) -> Result<Record, LedgerError> {
        self.transaction(record.key(), |tx| tx.insert(record))
    }

    /// # Errors
    /// Returns [`LedgerError::NotFound`] if nothing is stored under the key.
    pub fn remove(
        &self,
        kind: RecordKind,
        principal: &str,
        resource: &str,
    ) -> Result<Record, LedgerError> {
        self.transaction(LedgerKey::new(kind, principal, resource), |tx| tx.delete())
    }

    /// Moves an active purchase to [`PurchaseStatus::Refunded`].
    ///
    /// This is an update in place, not an insert: the purchase keeps its sequence.
    ///
    /// # Errors
    /// Returns [`LedgerError::NotFound`] if there is no active purchase for the pair.
    pub fn refund(&self, principal: &str, course: &str) -> Result<PurchaseRecord, LedgerError> {
        self.transaction(LedgerKey::purchase(principal, course), |tx| {
            let Some(Record::Purchase(mut purchase)) = tx.current()? else {
                return Err(not_found(tx.key()));
            };
            if !purchase.is_active() {
                return Err(not_found(tx.key()));
            }
            purchase.status = PurchaseStatus::Refunded;
            tx.replace(Record::Purchase(purchase.clone()))?;
            Ok(purchase)
        })
    }

    /// # Errors
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub fn count_by_resource(
        &self,
        kind: RecordKind,
        resource: &str,
    ) -> Result<usize, LedgerError> {
        Ok(self.store.list(kind)?.iter().filter(|e| e.record.resource() == resource).count())
    }

    /// Records of one kind held by `principal`, oldest first.
    ///
    /// # Errors
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub fn list_by_principal(
        &self,
        kind: RecordKind,
        principal: &str,
    ) -> Result<Vec<Record>, LedgerError> {
        self.list_where(kind, |record| record.principal() == principal)
    }

    /// Records of one kind attached to `resource`, oldest first.
    ///
    /// # Errors
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub fn list_by_resource(
        &self,
        kind: RecordKind,
        resource: &str,
    ) -> Result<Vec<Record>, LedgerError> {
        self.list_where(kind, |record| record.resource() == resource)
    }

    /// Runs `f` while owning `key`.
    ///
    /// Concurrent transactions on the same key run one after another; transactions on other
    /// keys are not blocked. Reads of other keys from inside `f` see committed state.
    ///
    /// # Errors
    /// Propagates whatever `f` returns.
    pub fn transaction<T, E>(
        &self,
        key: LedgerKey,
        f: impl FnOnce(&mut KeyTxn<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let _guard = self.locks.acquire(&key);
        let mut tx = KeyTxn { ledger: &self.inner, key };
        f(&mut tx)
    }

    fn list_where(
        &self,
        kind: RecordKind,
        keep: impl Fn(&Record) -> bool,
    ) -> Result<Vec<Record>, LedgerError> {
        let mut entries: Vec<StoredEntry> =
            self.store.list(kind)?.into_iter().filter(|e| keep(&e.record)).collect();
        entries.sort_by_key(|e| e.seq);
        Ok(entries.into_iter().map(|e| e.record).collect())
    }
}

impl LedgerInner {
    fn next_seq(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Number of keys currently owned by a transaction.
    #[must_use]
    pub fn keys_in_flight(&self) -> usize {
        self.locks.held()
    }
}

/// Mutations on a single owned key. Obtained through [`Ledger::transaction`].
#[derive(Debug)]
pub struct KeyTxn<'a> {
    ledger: &'a LedgerInner,
    key: LedgerKey,
}

impl KeyTxn<'_> {
    #[must_use]
    pub const fn key(&self) -> &LedgerKey {
        &self.key
    }

    /// # Errors
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub fn current(&self) -> Result<Option<Record>, LedgerError> {
        Ok(self.ledger.store.get(&self.key)?.map(|entry| entry.record))
    }

    /// The stored entry under the key, insertion sequence included.
    ///
    /// # Errors
    /// Returns [`LedgerError::Store`] if the store cannot be read.
    pub fn current_entry(&self) -> Result<Option<StoredEntry>, LedgerError> {
        self.ledger.store.get(&self.key)
    }

    /// Puts the key back to a state read earlier with [`Self::current_entry`].
    ///
    /// Used to undo this transaction's own writes when a later step of the same action fails.
    ///
    /// # Errors
    /// * [`LedgerError::KeyMismatch`] if `prior` belongs to another key.
    /// * [`LedgerError::Store`] if the store cannot be written.
    pub fn restore(&mut self, prior: Option<StoredEntry>) -> Result<(), LedgerError> {
        match prior {
            Some(entry) => {
                self.check_key(&entry.record)?;
                self.ledger.store.put(self.key.clone(), entry)?;
            },
            None => {
                self.ledger.store.delete(&self.key)?;
            },
        }
        warn!(key = %self.key, "Ledger key restored");
        Ok(())
    }

    /// Inserts `record`, refusing to overwrite an existing one.
    ///
    /// # Errors
    /// * [`LedgerError::KeyMismatch`] if the record belongs to another key.
    /// * [`LedgerError::Duplicate`] if the key is already taken.
    pub fn insert(&mut self, record: Record) -> Result<Record, LedgerError> {
        self.check_key(&record)?;

        if let Some(existing) = self.ledger.store.get(&self.key)? {
            if !reactivates(&existing.record, &record) {
                return Err(LedgerError::Duplicate {
                    message: self.key.to_string().into(),
                    context: Some("Record already exists".into()),
                });
            }
            debug!(key = %self.key, "Reactivating refunded purchase");
        }

        let entry = StoredEntry { seq: self.ledger.next_seq(), record };
        self.ledger.store.put(self.key.clone(), entry.clone())?;
        info!(key = %self.key, seq = entry.seq, "Ledger record inserted");
        Ok(entry.record)
    }

    /// Overwrites the record stored under the key, keeping its insertion sequence.
    ///
    /// # Errors
    /// * [`LedgerError::KeyMismatch`] if the record belongs to another key.
    /// * [`LedgerError::NotFound`] if nothing is stored under the key.
    pub fn replace(&mut self, record: Record) -> Result<Record, LedgerError> {
        self.check_key(&record)?;

        let Some(existing) = self.ledger.store.get(&self.key)? else {
            return Err(not_found(&self.key));
        };

        let entry = StoredEntry { seq: existing.seq, record };
        self.ledger.store.put(self.key.clone(), entry.clone())?;
        info!(key = %self.key, seq = entry.seq, "Ledger record updated");
        Ok(entry.record)
    }

    /// # Errors
    /// Returns [`LedgerError::NotFound`] if nothing is stored under the key.
    pub fn delete(&mut self) -> Result<Record, LedgerError> {
        let removed = self.ledger.store.delete(&self.key)?.ok_or_else(|| not_found(&self.key))?;
        info!(key = %self.key, "Ledger record removed");
        Ok(removed.record)
    }

    fn check_key(&self, record: &Record) -> Result<(), LedgerError> {
        let key = record.key();
        if key == self.key {
            Ok(())
        } else {
            Err(LedgerError::KeyMismatch {
                message: format!("expected {}, got {key}", self.key).into(),
                context: None,
            })
        }
    }
}

/// An active purchase may take the slot of a refunded one.
fn reactivates(existing: &Record, incoming: &Record) -> bool {
    matches!(
        (existing, incoming),
        (Record::Purchase(old), Record::Purchase(new))
            if old.status == PurchaseStatus::Refunded && new.status == PurchaseStatus::Active
    )
}

fn not_found(key: &LedgerKey) -> LedgerError {
    LedgerError::NotFound { message: key.to_string().into(), context: None }
}
