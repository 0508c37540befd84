use chub_catalog::CatalogView;
use chub_domain::identity::Principal;
use chub_domain::records::RecordKind;
use chub_kernel::error::RuleError;
use chub_kernel::pipeline::RuleChain;
use chub_kernel::security::access::AccessGuard;
use chub_ledger::Ledger;

#[derive(Debug)]
pub struct CreateBookmark<'a> {
    pub principal: &'a Principal,
    pub course_id: &'a str,
    pub catalog: &'a dyn CatalogView,
    pub ledger: &'a Ledger,
}

/// Removal references the bookmark by its owner, which may differ from the requester.
#[derive(Debug)]
pub struct RemoveBookmark<'a> {
    pub principal: &'a Principal,
    pub owner: &'a str,
    pub course_id: &'a str,
    pub ledger: &'a Ledger,
}

#[must_use]
pub fn create_chain<'a>() -> RuleChain<CreateBookmark<'a>> {
    RuleChain::<CreateBookmark<'a>>::new("bookmark.create")
        .rule("authenticated", |a| AccessGuard::require_authenticated(a.principal).map(|_| ()))
        .rule("course exists", course_exists)
        .rule("not bookmarked", not_bookmarked)
}

#[must_use]
pub fn remove_chain<'a>() -> RuleChain<RemoveBookmark<'a>> {
    RuleChain::<RemoveBookmark<'a>>::new("bookmark.remove")
        .rule("authenticated", |a| AccessGuard::require_authenticated(a.principal).map(|_| ()))
        .rule("bookmark exists", bookmark_exists)
        .rule("owner", |a| AccessGuard::require_owner(a.principal, a.owner))
}

fn course_exists(a: &CreateBookmark<'_>) -> Result<(), RuleError> {
    a.catalog
        .course(a.course_id)
        .map(|_| ())
        .ok_or_else(|| RuleError::not_found("course not found"))
}

fn not_bookmarked(a: &CreateBookmark<'_>) -> Result<(), RuleError> {
    let id = AccessGuard::require_authenticated(a.principal)?;
    if a.ledger.exists(RecordKind::Bookmark, id, a.course_id)? {
        Err(RuleError::duplicate("already bookmarked"))
    } else {
        Ok(())
    }
}

fn bookmark_exists(a: &RemoveBookmark<'_>) -> Result<(), RuleError> {
    if a.ledger.exists(RecordKind::Bookmark, a.owner, a.course_id)? {
        Ok(())
    } else {
        Err(RuleError::not_found("bookmark not found"))
    }
}
