use chub_domain::identity::Principal;
use chub_domain::records::RecordKind;
use chub_kernel::error::RuleError;
use chub_kernel::pipeline::RuleChain;
use chub_kernel::security::access::AccessGuard;
use chub_ledger::Ledger;
use chub_purchases::rules::has_active_purchase;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug)]
pub struct ReviewAttempt<'a> {
    pub principal: &'a Principal,
    pub course_id: &'a str,
    /// As submitted; only `1..=5` is accepted.
    pub rating: i32,
    pub text: &'a str,
    pub ledger: &'a Ledger,
}

#[must_use]
pub fn review_chain<'a>() -> RuleChain<ReviewAttempt<'a>> {
    RuleChain::<ReviewAttempt<'a>>::new("review.create")
        .rule("authenticated", |a| AccessGuard::require_authenticated(a.principal).map(|_| ()))
        .rule("active purchase", active_purchase)
        .rule("rating in range", rating_in_range)
        .rule("text present", text_present)
        .rule("not reviewed", not_reviewed)
}

fn active_purchase(a: &ReviewAttempt<'_>) -> Result<(), RuleError> {
    let id = AccessGuard::require_authenticated(a.principal)?;
    if has_active_purchase(a.ledger, id, a.course_id)? {
        Ok(())
    } else {
        Err(RuleError::invalid("purchase", "not purchased"))
    }
}

fn rating_in_range(a: &ReviewAttempt<'_>) -> Result<(), RuleError> {
    if (MIN_RATING..=MAX_RATING).contains(&a.rating) {
        Ok(())
    } else {
        Err(RuleError::invalid("rating", "invalid rating"))
    }
}

fn text_present(a: &ReviewAttempt<'_>) -> Result<(), RuleError> {
    if a.text.trim().is_empty() {
        Err(RuleError::invalid("text", "review text required"))
    } else {
        Ok(())
    }
}

fn not_reviewed(a: &ReviewAttempt<'_>) -> Result<(), RuleError> {
    let id = AccessGuard::require_authenticated(a.principal)?;
    if a.ledger.exists(RecordKind::Review, id, a.course_id)? {
        Err(RuleError::duplicate("review already exists"))
    } else {
        Ok(())
    }
}
