use chub_domain::records::LedgerKey;
use fxhash::FxHashSet;
use parking_lot::{Condvar, Mutex};

/// Registry of keys currently owned by a writer.
///
/// A key is owned from [`KeyLocks::acquire`] until its [`KeyGuard`] drops. Writers of the same
/// key queue on the condition variable; writers of other keys only share the short
/// bookkeeping critical section.
#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    held: Mutex<FxHashSet<LedgerKey>>,
    released: Condvar,
}

impl KeyLocks {
    pub(crate) fn acquire(&self, key: &LedgerKey) -> KeyGuard<'_> {
        let mut held = self.held.lock();
        while held.contains(key) {
            self.released.wait(&mut held);
        }
        held.insert(key.clone());

        KeyGuard { locks: self, key: key.clone() }
    }

    pub(crate) fn held(&self) -> usize {
        self.held.lock().len()
    }
}

#[derive(Debug)]
pub(crate) struct KeyGuard<'a> {
    locks: &'a KeyLocks,
    key: LedgerKey,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        self.locks.held.lock().remove(&self.key);
        self.locks.released.notify_all();
    }
}
