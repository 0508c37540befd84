use crate::engine::Ledger;
use crate::error::{LedgerError, LedgerErrorExt};
use crate::store::{MemoryStore, PersistenceStore};
use chub_domain::records::RecordKind;
use private::Sealed;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoStore;
#[derive(Debug)]
pub struct WithStore(Arc<dyn PersistenceStore>);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoStore {}
impl Sealed for WithStore {}

#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct LedgerBuilder<S: Sealed = NoStore> {
    state: S,
}

impl LedgerBuilder<NoStore> {
    #[must_use = "Creates a new ledger builder"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the persistence store backing the ledger"]
    pub fn store(self, store: Arc<dyn PersistenceStore>) -> LedgerBuilder<WithStore> {
        LedgerBuilder { state: WithStore(store) }
    }

    #[must_use = "Backs the ledger with a fresh in-memory store"]
    pub fn in_memory(self) -> LedgerBuilder<WithStore> {
        self.store(Arc::new(MemoryStore::new()))
    }
}

impl LedgerBuilder<WithStore> {
    /// Opens the ledger over the configured store.
    ///
    /// Scans every record kind once to resume the insertion sequence after the highest
    /// sequence already persisted, so listings keep their order across restarts.
    ///
    /// # Errors
    /// Returns [`LedgerError::Store`] if the store cannot be listed.
    pub fn open(self) -> Result<Ledger, LedgerError> {
        let store = self.state.0;

        let mut last_seq = 0;
        let mut records = 0usize;
        for kind in RecordKind::ALL {
            let entries = store.list(kind).context(format!("Resuming {kind} sequence"))?;
            records += entries.len();
            last_seq = entries.iter().map(|e| e.seq).fold(last_seq, u64::max);
        }

        info!(records, last_seq, "Opened interaction ledger");

        Ok(Ledger::from_parts(store, last_seq))
    }
}
