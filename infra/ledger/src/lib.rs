//! The interaction ledger.
//!
//! Authoritative store of bookmarks, purchases, reviews, registrations and purchase audit
//! entries, enforcing uniqueness per `(kind, principal, resource)`.
//!
//! # Core Features
//!
//! - **Composite-key index**: constant-time existence checks by [`LedgerKey`](chub_domain::records::LedgerKey).
//! - **Per-key atomicity**: check-then-write runs inside [`Ledger::transaction`], which owns
//!   the key for its whole duration. Different keys proceed independently.
//! - **Pluggable persistence**: every read and write goes through a [`PersistenceStore`].
//! - **Stable ordering**: listings preserve insertion order via a ledger-assigned sequence.
//!
//! # Examples
//!
//! ```rust
//! use chub_domain::records::{LedgerKey, RecordKind};
//! use chub_ledger::{Ledger, LedgerError};
//!
//! # fn main() -> Result<(), LedgerError> {
//! let ledger = Ledger::builder().in_memory().open()?;
//!
//! let missing = ledger.transaction(LedgerKey::bookmark("user@example.com", "course-1"), |tx| {
//!     tx.current()
//! })?;
//! assert!(missing.is_none());
//! assert!(!ledger.exists(RecordKind::Bookmark, "user@example.com", "course-1")?);
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
mod locks;
mod store;

pub use builder::LedgerBuilder;
pub use engine::{KeyTxn, Ledger};
pub use error::{LedgerError, LedgerErrorExt};
pub use store::{MemoryStore, PersistenceStore, StoredEntry};
