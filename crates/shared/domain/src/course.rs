use crate::constants::DEFAULT_CATEGORY;
use serde::{Deserialize, Serialize};

/// Publication state of a course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Draft,
    #[default]
    Published,
}

/// A course as owned by the catalog. Read-only to the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: CourseStatus,
    /// Email of the authoring educator, when known.
    pub owner: Option<String>,
    pub category: String,
    /// Listed for signed-out visitors.
    pub public: bool,
    /// Downloadable material file names, unlocked by an active purchase.
    pub materials: Vec<String>,
    /// Assessment (test) names, unlocked by an active purchase.
    pub assessments: Vec<String>,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: String::new(),
            status: CourseStatus::Published,
            owner: None,
            category: DEFAULT_CATEGORY.to_owned(),
            public: true,
            materials: Vec::new(),
            assessments: Vec::new(),
        }
    }
}

impl Course {
    /// A published, public course in the default category.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), ..Self::default() }
    }

    #[must_use]
    pub const fn with_status(mut self, status: CourseStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub const fn with_public(mut self, public: bool) -> Self {
        self.public = public;
        self
    }

    #[must_use]
    pub fn with_materials<I, S>(mut self, materials: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.materials = materials.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_assessments<I, S>(mut self, assessments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assessments = assessments.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn is_published(&self) -> bool {
        self.status == CourseStatus::Published
    }

    #[must_use]
    pub fn is_owned_by(&self, principal_id: &str) -> bool {
        self.owner.as_deref() == Some(principal_id)
    }
}
