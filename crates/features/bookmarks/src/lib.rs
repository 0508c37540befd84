//! Bookmark feature slice.
//!
//! A signed-in user keeps at most one bookmark per course. Creation and removal run their
//! rule chain while owning the bookmark's ledger key, so concurrent duplicates cannot slip in
//! between the check and the write.

pub mod rules;

use crate::rules::{CreateBookmark, RemoveBookmark, create_chain, remove_chain};
use chub_catalog::CatalogView;
use chub_domain::identity::Principal;
use chub_domain::records::{BookmarkRecord, LedgerKey, Record, RecordKind};
use chub_kernel::clock::Clock;
use chub_kernel::error::RuleError;
use chub_kernel::security::access::AccessGuard;
use chub_ledger::Ledger;
use fxhash::FxHashSet;
use std::sync::Arc;
use tracing::info;

/// Bookmark feature state.
#[chub_derive::chub_slice]
pub struct Bookmarks {
    ledger: Ledger,
    catalog: Arc<dyn CatalogView>,
    clock: Arc<dyn Clock>,
}

/// Initialize the bookmark feature.
#[must_use]
pub fn init(ledger: Ledger, catalog: Arc<dyn CatalogView>, clock: Arc<dyn Clock>) -> Bookmarks {
    info!("Bookmarks slice initialized");

    Bookmarks::new(BookmarksInner { ledger, catalog, clock })
}

impl Bookmarks {
    /// Bookmarks `course_id` for the principal.
    ///
    /// # Errors
    /// * [`RuleError::AuthenticationRequired`] when signed out.
    /// * [`RuleError::NotFound`] (`course not found`) for unknown courses.
    /// * [`RuleError::Duplicate`] (`already bookmarked`).
    pub fn create(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<BookmarkRecord, RuleError> {
        let owner = principal.id().unwrap_or_default();
        let attempt = CreateBookmark {
            principal,
            course_id,
            catalog: self.catalog.as_ref(),
            ledger: &self.ledger,
        };

        let key = LedgerKey::bookmark(owner, course_id);
        self.ledger.transaction(key, |tx| -> Result<_, RuleError> {
            create_chain().evaluate(&attempt)?;

            let record = BookmarkRecord {
                principal: owner.to_owned(),
                course: course_id.to_owned(),
                created_at: self.clock.now(),
            };
            tx.insert(Record::Bookmark(record.clone()))?;
            info!(principal = owner, course = course_id, "Bookmark created");
            Ok(record)
        })
    }

    /// Removes the bookmark `owner` holds on `course_id`.
    ///
    /// # Errors
    /// * [`RuleError::AuthenticationRequired`] when signed out.
    /// * [`RuleError::NotFound`] (`bookmark not found`).
    /// * [`RuleError::AuthorizationDenied`] when the requester is not `owner`.
    pub fn remove(
        &self,
        principal: &Principal,
        owner: &str,
        course_id: &str,
    ) -> Result<BookmarkRecord, RuleError> {
        let attempt = RemoveBookmark { principal, owner, course_id, ledger: &self.ledger };

        let key = LedgerKey::bookmark(owner, course_id);
        self.ledger.transaction(key, |tx| -> Result<_, RuleError> {
            remove_chain().evaluate(&attempt)?;

            match tx.delete()? {
                Record::Bookmark(record) => {
                    info!(principal = owner, course = course_id, "Bookmark removed");
                    Ok(record)
                },
                other => Err(RuleError::from(format!("unexpected {} record", other.kind()))),
            }
        })
    }

    /// The principal's bookmarks, oldest first.
    ///
    /// # Errors
    /// Returns [`RuleError::AuthenticationRequired`] when signed out.
    pub fn list(&self, principal: &Principal) -> Result<Vec<BookmarkRecord>, RuleError> {
        let id = AccessGuard::require_authenticated(principal)?;
        Ok(self
            .ledger
            .list_by_principal(RecordKind::Bookmark, id)?
            .into_iter()
            .filter_map(|r| match r {
                Record::Bookmark(b) => Some(b),
                _ => None,
            })
            .collect())
    }

    /// Bookmarked course ids; empty for signed-out visitors.
    ///
    /// # Errors
    /// Returns [`RuleError::Ledger`] if the ledger cannot be read.
    pub fn bookmarked_courses(
        &self,
        principal: &Principal,
    ) -> Result<FxHashSet<String>, RuleError> {
        if !principal.is_authenticated() {
            return Ok(FxHashSet::default());
        }
        Ok(self.list(principal)?.into_iter().map(|b| b.course).collect())
    }

    /// Number of users who bookmarked `course_id`.
    ///
    /// # Errors
    /// Returns [`RuleError::Ledger`] if the ledger cannot be read.
    pub fn count(&self, course_id: &str) -> Result<usize, RuleError> {
        Ok(self.ledger.count_by_resource(RecordKind::Bookmark, course_id)?)
    }
}
