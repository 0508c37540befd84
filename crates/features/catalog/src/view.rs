//! Read access to the course catalog.
//!
//! The catalog is owned elsewhere; the engine only reads it through [`CatalogView`] and, for
//! course authoring, appends through [`CourseStore`].

use crate::error::{CatalogError, CatalogErrorExt};
use crate::visibility;
use chub_domain::course::Course;
use chub_domain::identity::Principal;
use parking_lot::RwLock;
use std::fmt::Debug;
use tracing::info;

pub trait CatalogView: Debug + Send + Sync {
    fn course(&self, id: &str) -> Option<Course>;

    /// Every course in natural catalog order.
    fn courses(&self) -> Vec<Course>;

    /// The courses `principal` may see, in natural order.
    fn list_visible(&self, principal: &Principal) -> Vec<Course> {
        visibility::visible_to(principal, self.courses())
    }
}

pub trait CourseStore: CatalogView {
    /// Appends a new course.
    ///
    /// # Errors
    /// Returns [`CatalogError::Duplicate`] if the id is already taken.
    fn insert(&self, course: Course) -> Result<Course, CatalogError>;
}

/// Catalog kept in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    courses: RwLock<Vec<Course>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        Self { courses: RwLock::new(courses.into_iter().collect()) }
    }

    /// Loads a catalog from a JSON array of courses.
    ///
    /// # Errors
    /// Returns [`CatalogError::Json`] if the document is not a course array.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let courses: Vec<Course> = serde_json::from_str(json).context("Parsing course list")?;
        info!(courses = courses.len(), "Loaded catalog fixture");
        Ok(Self::from_courses(courses))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.read().is_empty()
    }
}

impl CatalogView for InMemoryCatalog {
    fn course(&self, id: &str) -> Option<Course> {
        self.courses.read().iter().find(|c| c.id == id).cloned()
    }

    fn courses(&self) -> Vec<Course> {
        self.courses.read().clone()
    }
}

impl CourseStore for InMemoryCatalog {
    fn insert(&self, course: Course) -> Result<Course, CatalogError> {
        let mut courses = self.courses.write();
        if courses.iter().any(|c| c.id == course.id) {
            return Err(CatalogError::Duplicate { message: course.id.into(), context: None });
        }
        courses.push(course.clone());
        Ok(course)
    }
}
