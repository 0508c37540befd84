//! Facade crate for the CourseHub rules engine.
//!
//! [`RulesEngine`] is the composition root: it opens one interaction ledger, initializes every
//! feature slice over it and exposes the platform actions. Keep this crate thin: decisions
//! live in the feature crates, this one only wires them together.
//!
//! ## Usage
//!
//! ```rust
//! use chub::domain::course::Course;
//! use chub::domain::identity::Principal;
//! use chub::features::catalog::{InMemoryCatalog, ListingQuery};
//! use chub::RulesEngine;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = InMemoryCatalog::from_courses([Course::new("course-101", "Intro to Rust")]);
//! let engine = RulesEngine::builder().catalog(Arc::new(catalog)).build()?;
//!
//! let page = engine.list_courses(&Principal::anonymous(), &ListingQuery::default())?;
//! assert_eq!(page.total, 1);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;

pub use crate::builder::{EngineBuilder, NoCatalog, WithCatalog};
pub use crate::error::{EngineError, EngineErrorExt};
pub use chub_domain as domain;
pub use chub_kernel as kernel;
pub use chub_kernel::error::RuleError;

/// The feature crates, re-exported for their collaborator traits and request types.
pub mod features {
    pub use chub_bookmarks as bookmarks;
    pub use chub_catalog as catalog;
    pub use chub_purchases as purchases;
    pub use chub_registration as registration;
    pub use chub_reviews as reviews;
}

use chub_bookmarks::Bookmarks;
use chub_catalog::{
    Catalog, CourseDraft, CoursePage, FileUpload, ListingQuery, UploadScope, UploadVerdict,
};
use chub_domain::config::EngineConfig;
use chub_domain::course::Course;
use chub_domain::identity::Principal;
use chub_domain::records::{
    BookmarkRecord, PurchaseRecord, RegistrationRecord, ReviewRecord, TransactionRecord,
};
use chub_domain::registry::InitializedSlice;
use chub_ledger::Ledger;
use chub_logger::Logger;
use chub_purchases::Purchases;
use chub_registration::{Registration, SignUpForm};
use chub_reviews::Reviews;

/// The assembled rules engine.
///
/// Cloning is cheap: every slice is an `Arc` handle and all of them share one [`Ledger`].
#[derive(Debug, Clone)]
pub struct RulesEngine {
    pub(crate) catalog: Catalog,
    pub(crate) bookmarks: Bookmarks,
    pub(crate) purchases: Purchases,
    pub(crate) reviews: Reviews,
    pub(crate) registration: Registration,
    pub(crate) ledger: Ledger,
    pub(crate) config: EngineConfig,
}

impl RulesEngine {
    #[must_use = "The engine is not assembled until you call .build()"]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Installs the global logger described by the `[logging]` configuration table.
    ///
    /// # Errors
    /// Returns [`EngineError::Logger`] if the settings are invalid or a logger is already set.
    pub fn init_logger(&self) -> Result<Logger, EngineError> {
        Ok(Logger::from_config(&self.config.logging)?)
    }

    /// Every feature slice, for runtime introspection.
    #[must_use]
    pub fn slices(&self) -> Vec<InitializedSlice> {
        vec![
            InitializedSlice::new(self.catalog.clone()),
            InitializedSlice::new(self.bookmarks.clone()),
            InitializedSlice::new(self.purchases.clone()),
            InitializedSlice::new(self.reviews.clone()),
            InitializedSlice::new(self.registration.clone()),
        ]
    }

    // --- Catalog ---

    #[must_use]
    pub fn course(&self, course_id: &str) -> Option<Course> {
        self.catalog.course(course_id)
    }

    /// Lists the courses visible to `principal`, with the principal's bookmarks first.
    ///
    /// # Errors
    /// Returns [`RuleError::Ledger`] if the bookmarks cannot be read.
    pub fn list_courses(
        &self,
        principal: &Principal,
        query: &ListingQuery,
    ) -> Result<CoursePage, RuleError> {
        let bookmarked = self.bookmarks.bookmarked_courses(principal)?;
        Ok(self.catalog.list(principal, query, &bookmarked))
    }

    /// Case-insensitive title search over the whole catalog.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Course> {
        self.catalog.search(term)
    }

    /// # Errors
    /// [`RuleError::UnsupportedFileType`] or [`RuleError::FileTooLarge`].
    pub fn validate_upload(
        &self,
        upload: &FileUpload,
        scope: UploadScope,
    ) -> Result<UploadVerdict, RuleError> {
        self.catalog.validate_upload(upload, scope)
    }

    /// Publishes a new course owned by `principal`.
    ///
    /// # Errors
    /// See [`Catalog::create_course`].
    pub fn create_course(
        &self,
        principal: &Principal,
        draft: &CourseDraft,
    ) -> Result<Course, RuleError> {
        self.catalog.create_course(principal, draft)
    }

    /// # Errors
    /// See [`Catalog::save_draft`].
    pub fn save_draft(
        &self,
        principal: &Principal,
        draft: &CourseDraft,
    ) -> Result<Course, RuleError> {
        self.catalog.save_draft(principal, draft)
    }

    // --- Bookmarks ---

    /// # Errors
    /// See [`Bookmarks::create`].
    pub fn bookmark(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<BookmarkRecord, RuleError> {
        self.bookmarks.create(principal, course_id)
    }

    /// # Errors
    /// See [`Bookmarks::remove`].
    pub fn remove_bookmark(
        &self,
        principal: &Principal,
        owner: &str,
        course_id: &str,
    ) -> Result<BookmarkRecord, RuleError> {
        self.bookmarks.remove(principal, owner, course_id)
    }

    /// # Errors
    /// [`RuleError::AuthenticationRequired`] when signed out.
    pub fn bookmarks(&self, principal: &Principal) -> Result<Vec<BookmarkRecord>, RuleError> {
        self.bookmarks.list(principal)
    }

    /// # Errors
    /// Returns [`RuleError::Ledger`] if the ledger cannot be read.
    pub fn bookmark_count(&self, course_id: &str) -> Result<usize, RuleError> {
        self.bookmarks.count(course_id)
    }

    // --- Purchases ---

    /// # Errors
    /// See [`Purchases::purchase`].
    pub fn purchase(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<PurchaseRecord, RuleError> {
        self.purchases.purchase(principal, course_id)
    }

    /// Marks an active purchase refunded. Driven by the refund workflow, not by end users.
    ///
    /// # Errors
    /// [`RuleError::NotFound`] if there is no active purchase.
    pub fn refund(&self, principal_id: &str, course_id: &str) -> Result<PurchaseRecord, RuleError> {
        self.purchases.refund(principal_id, course_id)
    }

    /// # Errors
    /// Returns [`RuleError::Ledger`] if the ledger cannot be read.
    pub fn has_active_purchase(
        &self,
        principal_id: &str,
        course_id: &str,
    ) -> Result<bool, RuleError> {
        self.purchases.has_active_purchase(principal_id, course_id)
    }

    /// # Errors
    /// See [`Purchases::materials`].
    pub fn materials(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<Vec<String>, RuleError> {
        self.purchases.materials(principal, course_id)
    }

    /// # Errors
    /// See [`Purchases::assessments`].
    pub fn assessments(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<Vec<String>, RuleError> {
        self.purchases.assessments(principal, course_id)
    }

    /// # Errors
    /// [`RuleError::AuthenticationRequired`] when signed out.
    pub fn transactions(&self, principal: &Principal) -> Result<Vec<TransactionRecord>, RuleError> {
        self.purchases.transactions(principal)
    }

    // --- Reviews ---

    /// # Errors
    /// See [`Reviews::submit`].
    pub fn review(
        &self,
        principal: &Principal,
        course_id: &str,
        rating: i32,
        text: &str,
    ) -> Result<ReviewRecord, RuleError> {
        self.reviews.submit(principal, course_id, rating, text)
    }

    /// # Errors
    /// Returns [`RuleError::Ledger`] if the ledger cannot be read.
    pub fn reviews(&self, course_id: &str) -> Result<Vec<ReviewRecord>, RuleError> {
        self.reviews.for_course(course_id)
    }

    // --- Registration ---

    /// # Errors
    /// See [`Registration::register`].
    pub fn register(&self, form: &SignUpForm) -> Result<RegistrationRecord, RuleError> {
        self.registration.register(form)
    }

    /// # Errors
    /// See [`Registration::confirm`].
    pub fn confirm_registration(&self, email: &str) -> Result<RegistrationRecord, RuleError> {
        self.registration.confirm(email)
    }

    /// # Errors
    /// See [`Registration::login`].
    pub fn login(&self, email: &str, password: &str) -> Result<Principal, RuleError> {
        self.registration.login(email, password)
    }
}
