//! Role-keyed course visibility.
//!
//! Exactly one strategy applies per request, chosen by the principal's effective role. The
//! strategies never stack: an admin does not additionally get the educator filter.

use chub_domain::course::Course;
use chub_domain::identity::{Principal, Role};
use std::fmt::Debug;

pub trait VisibilityPolicy: Debug + Send + Sync {
    fn admits(&self, principal: &Principal, course: &Course) -> bool;
}

/// Everything, drafts included.
#[derive(Debug)]
pub struct AdminVisibility;

/// Only courses the educator owns.
#[derive(Debug)]
pub struct EducatorVisibility;

/// Published courses.
#[derive(Debug)]
pub struct StudentVisibility;

/// Public courses. Also applies to signed-out visitors.
#[derive(Debug)]
pub struct GuestVisibility;

impl VisibilityPolicy for AdminVisibility {
    fn admits(&self, _principal: &Principal, _course: &Course) -> bool {
        true
    }
}

impl VisibilityPolicy for EducatorVisibility {
    fn admits(&self, principal: &Principal, course: &Course) -> bool {
        principal.id().is_some_and(|id| course.is_owned_by(id))
    }
}

impl VisibilityPolicy for StudentVisibility {
    fn admits(&self, _principal: &Principal, course: &Course) -> bool {
        course.is_published()
    }
}

impl VisibilityPolicy for GuestVisibility {
    fn admits(&self, _principal: &Principal, course: &Course) -> bool {
        course.public
    }
}

#[must_use]
pub const fn for_role(role: Role) -> &'static dyn VisibilityPolicy {
    match role {
        Role::Admin => &AdminVisibility,
        Role::Educator => &EducatorVisibility,
        Role::Student => &StudentVisibility,
        Role::Guest => &GuestVisibility,
    }
}

/// Keeps the courses `principal` may see, preserving order.
#[must_use]
pub fn visible_to(principal: &Principal, courses: Vec<Course>) -> Vec<Course> {
    let policy = for_role(principal.effective_role());
    courses.into_iter().filter(|c| policy.admits(principal, c)).collect()
}
