//! Catalog feature slice.
//!
//! Course visibility per role, the listing pipeline, upload validation and course authoring.
//! The catalog itself is an external collaborator reached through [`CatalogView`] and
//! [`CourseStore`].

pub mod authoring;
mod error;
pub mod listing;
pub mod upload;
pub mod view;
pub mod visibility;

pub use crate::authoring::CourseDraft;
pub use crate::error::{CatalogError, CatalogErrorExt};
pub use crate::listing::{CoursePage, ListingEngine, ListingQuery};
pub use crate::upload::{FileUpload, UploadScope, UploadVerdict};
pub use crate::view::{CatalogView, CourseStore, InMemoryCatalog};

use crate::authoring::{Authoring, build_course, draft_chain, publish_chain};
use chub_domain::config::EngineConfig;
use chub_domain::course::{Course, CourseStatus};
use chub_domain::identity::Principal;
use chub_kernel::error::{RuleError, RuleErrorExt};
use fxhash::FxHashSet;
use std::sync::Arc;
use tracing::info;

/// Catalog feature state.
#[chub_derive::chub_slice]
pub struct Catalog {
    store: Arc<dyn CourseStore>,
    listing: ListingEngine,
    config: EngineConfig,
}

/// Initialize the catalog feature over `store`.
#[must_use]
pub fn init(store: Arc<dyn CourseStore>, config: &EngineConfig) -> Catalog {
    info!("Catalog slice initialized");

    Catalog::new(CatalogInner {
        store,
        listing: ListingEngine::new(config.listing.clone()),
        config: config.clone(),
    })
}

impl Catalog {
    /// The catalog as a read-only view for other slices.
    #[must_use]
    pub fn view(&self) -> Arc<dyn CatalogView> {
        Arc::clone(&self.store) as Arc<dyn CatalogView>
    }

    #[must_use]
    pub fn course(&self, id: &str) -> Option<Course> {
        self.store.course(id)
    }

    #[must_use]
    pub fn list(
        &self,
        principal: &Principal,
        query: &ListingQuery,
        bookmarked: &FxHashSet<String>,
    ) -> CoursePage {
        self.listing.list(self.store.as_ref(), principal, query, bookmarked)
    }

    #[must_use]
    pub fn search(&self, term: &str) -> Vec<Course> {
        self.listing.search(self.store.as_ref(), term)
    }

    /// # Errors
    /// [`RuleError::UnsupportedFileType`] or [`RuleError::FileTooLarge`].
    pub fn validate_upload(
        &self,
        upload: &FileUpload,
        scope: UploadScope,
    ) -> Result<UploadVerdict, RuleError> {
        upload::validate_upload(&self.config.policy.uploads, upload, scope)
    }

    /// Creates and publishes a course.
    ///
    /// # Errors
    /// The first failing rule of [`authoring::publish_chain`], or [`RuleError::Internal`] if the
    /// store refuses the course.
    pub fn create_course(
        &self,
        principal: &Principal,
        draft: &CourseDraft,
    ) -> Result<Course, RuleError> {
        let attempt = Authoring { principal, draft, policy: &self.config.policy };
        publish_chain().evaluate(&attempt)?;
        self.persist(principal, draft, CourseStatus::Published)
    }

    /// Saves a course as a draft; an empty title is replaced by the configured placeholder.
    ///
    /// # Errors
    /// The first failing rule of [`authoring::draft_chain`], or [`RuleError::Internal`] if the
    /// store refuses the course.
    pub fn save_draft(
        &self,
        principal: &Principal,
        draft: &CourseDraft,
    ) -> Result<Course, RuleError> {
        let attempt = Authoring { principal, draft, policy: &self.config.policy };
        draft_chain().evaluate(&attempt)?;
        self.persist(principal, draft, CourseStatus::Draft)
    }

    fn persist(
        &self,
        principal: &Principal,
        draft: &CourseDraft,
        status: CourseStatus,
    ) -> Result<Course, RuleError> {
        let owner = principal.id().ok_or_else(RuleError::authentication_required)?;
        let course = build_course(owner, draft, status, &self.config.policy.draft_title);

        let course = self
            .store
            .insert(course)
            .map_err(|e| RuleError::from(e.to_string()))
            .context("Persisting course")?;

        info!(course = %course.id, owner, status = ?course.status, "Course saved");
        Ok(course)
    }
}
