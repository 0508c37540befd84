//! Course listing algebra.
//!
//! The free functions are the building blocks; [`ListingEngine::list`] composes them in a fixed
//! order: visibility, search, category, bookmark priority, pagination.

use crate::view::CatalogView;
use crate::visibility;
use chub_domain::config::ListingConfig;
use chub_domain::course::Course;
use chub_domain::identity::Principal;
use fxhash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Case-insensitive substring match over titles. An empty term matches everything.
#[must_use]
pub fn search(courses: Vec<Course>, term: &str) -> Vec<Course> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return courses;
    }
    courses.into_iter().filter(|c| c.title.to_lowercase().contains(&needle)).collect()
}

#[must_use]
pub fn by_category(courses: Vec<Course>, category: &str) -> Vec<Course> {
    courses.into_iter().filter(|c| c.category == category).collect()
}

/// One-indexed page `[(page - 1) * size, page * size)`.
///
/// Page `0`, size `0` and pages past the end are all empty.
#[must_use]
pub fn paginate<T>(items: Vec<T>, page: usize, size: usize) -> Vec<T> {
    let Some(start) = page.checked_sub(1).and_then(|p| p.checked_mul(size)) else {
        return Vec::new();
    };
    if size == 0 || start >= items.len() {
        return Vec::new();
    }
    items.into_iter().skip(start).take(size).collect()
}

/// Stable partition: bookmarked courses first, each part keeping its relative order.
#[must_use]
pub fn prioritize_bookmarks(courses: Vec<Course>, bookmarked: &FxHashSet<String>) -> Vec<Course> {
    let (mut first, rest): (Vec<_>, Vec<_>) =
        courses.into_iter().partition(|c| bookmarked.contains(&c.id));
    first.extend(rest);
    first
}

/// What a caller asks the listing for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    /// One-indexed; `None` means the first page.
    pub page: Option<usize>,
    /// `None` means the configured default. Clamped to the configured maximum.
    pub page_size: Option<usize>,
}

impl ListingQuery {
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn page(mut self, page: usize, page_size: usize) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePage {
    pub items: Vec<Course>,
    pub page: usize,
    pub page_size: usize,
    /// Matching courses before pagination.
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ListingEngine {
    config: ListingConfig,
}

impl ListingEngine {
    #[must_use]
    pub const fn new(config: ListingConfig) -> Self {
        Self { config }
    }

    /// Runs the full listing pipeline for `principal`.
    ///
    /// `bookmarked` holds the ids the principal has bookmarked; pass an empty set for
    /// signed-out visitors.
    #[must_use]
    pub fn list(
        &self,
        catalog: &dyn CatalogView,
        principal: &Principal,
        query: &ListingQuery,
        bookmarked: &FxHashSet<String>,
    ) -> CoursePage {
        let mut courses = visibility::visible_to(principal, catalog.courses());
        if let Some(term) = &query.search {
            courses = search(courses, term);
        }
        if let Some(category) = &query.category {
            courses = by_category(courses, category);
        }
        if !bookmarked.is_empty() {
            courses = prioritize_bookmarks(courses, bookmarked);
        }

        let page = query.page.unwrap_or(1);
        let page_size =
            query.page_size.unwrap_or(self.config.default_page_size).min(self.config.max_page_size);
        let total = courses.len();
        let items = paginate(courses, page, page_size);

        debug!(role = %principal.effective_role(), total, page, page_size, "Listed courses");

        CoursePage { items, page, page_size, total }
    }

    /// Title search over the whole catalog, ignoring visibility.
    #[must_use]
    pub fn search(&self, catalog: &dyn CatalogView, term: &str) -> Vec<Course> {
        search(catalog.courses(), term)
    }
}
