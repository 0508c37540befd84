//! Course creation by educators and admins.

use crate::upload::{FileUpload, UploadScope, validate_upload};
use chub_domain::config::PolicyConfig;
use chub_domain::course::{Course, CourseStatus};
use chub_domain::identity::{Principal, RoleSet};
use chub_kernel::error::RuleError;
use chub_kernel::pipeline::RuleChain;
use chub_kernel::safe_nanoid;
use chub_kernel::security::access::AccessGuard;
use serde::{Deserialize, Serialize};

/// The course form as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub public: bool,
    pub materials: Vec<FileUpload>,
    pub assessments: Vec<String>,
}

impl Default for CourseDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: None,
            public: true,
            materials: Vec::new(),
            assessments: Vec::new(),
        }
    }
}

impl CourseDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { title: title.into(), description: description.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_material(mut self, upload: FileUpload) -> Self {
        self.materials.push(upload);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug)]
pub struct Authoring<'a> {
    pub principal: &'a Principal,
    pub draft: &'a CourseDraft,
    pub policy: &'a PolicyConfig,
}

#[must_use]
pub fn publish_chain<'a>() -> RuleChain<Authoring<'a>> {
    RuleChain::<Authoring<'a>>::new("course.create")
        .rule("authenticated", authenticated)
        .rule("author role", author_role)
        .rule("title required", title_required)
        .rule("materials valid", materials_valid)
}

#[must_use]
pub fn draft_chain<'a>() -> RuleChain<Authoring<'a>> {
    RuleChain::<Authoring<'a>>::new("course.draft")
        .rule("authenticated", authenticated)
        .rule("author role", author_role)
}

/// Turns an accepted form into a course owned by `owner`.
pub(crate) fn build_course(
    owner: &str,
    draft: &CourseDraft,
    status: CourseStatus,
    placeholder_title: &str,
) -> Course {
    let title = draft.title.trim();
    let title = if title.is_empty() { placeholder_title } else { title };

    let mut course = Course::new(safe_nanoid!(), title)
        .with_status(status)
        .with_owner(owner)
        .with_public(draft.public)
        .with_materials(draft.materials.iter().map(|m| m.filename.clone()))
        .with_assessments(draft.assessments.iter().cloned());
    course.description.clone_from(&draft.description);
    if let Some(category) = &draft.category {
        course.category.clone_from(category);
    }
    course
}

fn authenticated(a: &Authoring<'_>) -> Result<(), RuleError> {
    AccessGuard::require_authenticated(a.principal).map(|_| ())
}

fn author_role(a: &Authoring<'_>) -> Result<(), RuleError> {
    AccessGuard::require_role(a.principal, RoleSet::AUTHORS, "access denied")
}

fn title_required(a: &Authoring<'_>) -> Result<(), RuleError> {
    if a.draft.title.trim().is_empty() {
        Err(RuleError::invalid("title", "title is required"))
    } else {
        Ok(())
    }
}

fn materials_valid(a: &Authoring<'_>) -> Result<(), RuleError> {
    a.draft
        .materials
        .iter()
        .try_for_each(|m| validate_upload(&a.policy.uploads, m, UploadScope::Material).map(|_| ()))
}
