use crate::gateway::{PaymentGateway, PaymentReceipt};
use chub_domain::course::Course;
use chub_domain::identity::Principal;
use chub_domain::records::{LedgerKey, Record};
use chub_kernel::error::RuleError;
use chub_kernel::pipeline::RuleChain;
use chub_kernel::security::access::AccessGuard;
use chub_ledger::Ledger;
use std::cell::OnceCell;

#[derive(Debug)]
pub struct PurchaseAttempt<'a> {
    pub principal: &'a Principal,
    /// Resolved from the catalog before the chain runs.
    pub course: Option<Course>,
    pub ledger: &'a Ledger,
    pub gateway: &'a dyn PaymentGateway,
    /// Set by the payment rule once the charge went through.
    pub receipt: OnceCell<PaymentReceipt>,
}

#[derive(Debug)]
pub struct ContentAccess<'a> {
    pub principal: &'a Principal,
    pub course: Option<Course>,
    pub ledger: &'a Ledger,
}

#[must_use]
pub fn purchase_chain<'a>() -> RuleChain<PurchaseAttempt<'a>> {
    RuleChain::<PurchaseAttempt<'a>>::new("purchase.create")
        .rule("authenticated", |a| AccessGuard::require_authenticated(a.principal).map(|_| ()))
        .rule("course exists", |a| course_exists(a.course.as_ref()))
        .rule("no active purchase", no_active_purchase)
        .rule("payment succeeds", payment_succeeds)
}

#[must_use]
pub fn access_chain<'a>() -> RuleChain<ContentAccess<'a>> {
    RuleChain::<ContentAccess<'a>>::new("purchase.content")
        .rule("authenticated", |a| AccessGuard::require_authenticated(a.principal).map(|_| ()))
        .rule("course exists", |a| course_exists(a.course.as_ref()))
        .rule("active purchase", active_purchase)
}

/// True when `principal` holds an active purchase of `course`.
///
/// # Errors
/// Returns [`RuleError::Ledger`] if the ledger cannot be read.
pub fn has_active_purchase(
    ledger: &Ledger,
    principal: &str,
    course: &str,
) -> Result<bool, RuleError> {
    Ok(ledger
        .get(&LedgerKey::purchase(principal, course))?
        .as_ref()
        .and_then(Record::as_purchase)
        .is_some_and(|p| p.is_active()))
}

fn course_exists(course: Option<&Course>) -> Result<(), RuleError> {
    course.map(|_| ()).ok_or_else(|| RuleError::not_found("course not found"))
}

fn no_active_purchase(a: &PurchaseAttempt<'_>) -> Result<(), RuleError> {
    let id = AccessGuard::require_authenticated(a.principal)?;
    let course = a.course.as_ref().ok_or_else(|| RuleError::not_found("course not found"))?;
    if has_active_purchase(a.ledger, id, &course.id)? {
        Err(RuleError::duplicate("already purchased"))
    } else {
        Ok(())
    }
}

fn payment_succeeds(a: &PurchaseAttempt<'_>) -> Result<(), RuleError> {
    let id = AccessGuard::require_authenticated(a.principal)?;
    let course = a.course.as_ref().ok_or_else(|| RuleError::not_found("course not found"))?;

    let receipt = a.gateway.charge(id, course).map_err(|decline| RuleError::PaymentFailed {
        message: "payment failed".into(),
        context: Some(decline.to_string().into()),
    })?;

    a.receipt.set(receipt).map_err(|_| RuleError::from("payment charged twice"))
}

fn active_purchase(a: &ContentAccess<'_>) -> Result<(), RuleError> {
    let id = AccessGuard::require_authenticated(a.principal)?;
    let course = a.course.as_ref().ok_or_else(|| RuleError::not_found("course not found"))?;
    if has_active_purchase(a.ledger, id, &course.id)? {
        Ok(())
    } else {
        Err(RuleError::denied("not purchased"))
    }
}
