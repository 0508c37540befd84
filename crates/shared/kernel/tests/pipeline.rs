use chrono::{Duration, TimeZone, Utc};
use chub_kernel::prelude::*;
use std::cell::Cell;

struct Attempt<'a> {
    principal: &'a Principal,
    charged: &'a Cell<u32>,
}

fn signed_in(a: &Attempt<'_>) -> Result<(), RuleError> {
    AccessGuard::require_authenticated(a.principal).map(|_| ())
}

fn author(a: &Attempt<'_>) -> Result<(), RuleError> {
    AccessGuard::require_role(a.principal, RoleSet::AUTHORS, "unauthorized role")
}

fn charge(a: &Attempt<'_>) -> Result<(), RuleError> {
    a.charged.set(a.charged.get() + 1);
    Ok(())
}

fn chain<'a>() -> RuleChain<Attempt<'a>> {
    RuleChain::new("test.publish")
        .rule("authenticated", signed_in)
        .rule("author role", author)
        .rule("charge", charge)
}

#[test]
fn first_failure_wins_and_later_rules_do_not_run() {
    let charged = Cell::new(0);
    let anonymous = Principal::anonymous();

    let err = chain().evaluate(&Attempt { principal: &anonymous, charged: &charged }).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
    assert_eq!(charged.get(), 0);
}

#[test]
fn side_effect_runs_once_everything_before_it_holds() {
    let charged = Cell::new(0);
    let student = Principal::authenticated("student@example.com", Role::Student);
    let educator = Principal::authenticated("teacher@example.com", Role::Educator);

    let err = chain().evaluate(&Attempt { principal: &student, charged: &charged }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);
    assert_eq!(charged.get(), 0);

    chain().evaluate(&Attempt { principal: &educator, charged: &charged }).unwrap();
    assert_eq!(charged.get(), 1);
}

#[test]
fn chain_order_is_introspectable() {
    let chain = chain();
    assert_eq!(chain.action(), "test.publish");
    assert_eq!(chain.rule_names(), ["authenticated", "author role", "charge"]);
}

#[test]
fn manual_clock_moves_only_when_told() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let clock = ManualClock::new(start);

    assert_eq!(clock.now(), start);
    clock.advance(Duration::minutes(15));
    assert_eq!(clock.now(), start + Duration::minutes(15));

    clock.set(start);
    assert_eq!(clock.now(), start);
}
