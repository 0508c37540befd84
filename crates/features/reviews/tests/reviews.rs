use chrono::Utc;
use chub_domain::identity::{Principal, Role};
use chub_domain::outcome::ErrorKind;
use chub_domain::records::{PurchaseRecord, PurchaseStatus, Record};
use chub_kernel::clock::SystemClock;
use chub_ledger::Ledger;
use chub_reviews::rules::review_chain;
use chub_reviews::*;
use proptest::prelude::*;
use std::sync::Arc;

const STUDENT: &str = "user@example.com";
const COURSE: &str = "course-1";

fn setup() -> (Reviews, Ledger) {
    let ledger = Ledger::in_memory();
    (init(ledger.clone(), Arc::new(SystemClock)), ledger)
}

fn record_purchase(ledger: &Ledger, status: PurchaseStatus) {
    ledger
        .put(Record::Purchase(PurchaseRecord {
            principal: STUDENT.to_owned(),
            course: COURSE.to_owned(),
            status,
            purchased_at: Utc::now(),
            payment_reference: "pay-1".to_owned(),
        }))
        .unwrap();
}

fn student() -> Principal {
    Principal::authenticated(STUDENT, Role::Student)
}

#[test]
fn review_before_and_after_purchase() {
    let (reviews, ledger) = setup();

    let err = reviews.submit(&student(), COURSE, 5, "Great course").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(err.reason(), "not purchased");

    record_purchase(&ledger, PurchaseStatus::Active);
    let review = reviews.submit(&student(), COURSE, 5, "Great course").unwrap();
    assert_eq!(review.rating, 5);
    assert_eq!(reviews.for_course(COURSE).unwrap(), [review]);
}

#[test]
fn refunded_purchase_does_not_count() {
    let (reviews, ledger) = setup();
    record_purchase(&ledger, PurchaseStatus::Refunded);

    let err = reviews.submit(&student(), COURSE, 4, "Meh").unwrap_err();
    assert_eq!(err.reason(), "not purchased");
}

#[test]
fn empty_text_is_rejected() {
    let (reviews, ledger) = setup();
    record_purchase(&ledger, PurchaseStatus::Active);

    let err = reviews.submit(&student(), COURSE, 4, "   ").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(err.reason(), "review text required");
}

#[test]
fn long_text_is_kept_verbatim() {
    let (reviews, ledger) = setup();
    record_purchase(&ledger, PurchaseStatus::Active);
    let text = "a".repeat(1000);

    let review = reviews.submit(&student(), COURSE, 4, &text).unwrap();
    assert_eq!(review.text.len(), 1000);
}

#[test]
fn one_review_per_course() {
    let (reviews, ledger) = setup();
    record_purchase(&ledger, PurchaseStatus::Active);
    reviews.submit(&student(), COURSE, 5, "Good course").unwrap();

    let err = reviews.submit(&student(), COURSE, 3, "Changed my mind").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(err.reason(), "review already exists");
    assert_eq!(reviews.for_course(COURSE).unwrap().len(), 1);
}

#[test]
fn anonymous_reviewers_must_sign_in() {
    let (reviews, _) = setup();
    let err = reviews.submit(&Principal::anonymous(), COURSE, 5, "Nice").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
}

#[test]
fn rule_order() {
    assert_eq!(
        review_chain().rule_names(),
        ["authenticated", "active purchase", "rating in range", "text present", "not reviewed"]
    );
}

proptest! {
    #[test]
    fn out_of_range_rating_fails_regardless_of_text(
        rating in prop_oneof![i32::MIN..1, 6..i32::MAX],
        text in ".{0,40}",
    ) {
        let (reviews, ledger) = setup();
        record_purchase(&ledger, PurchaseStatus::Active);

        let err = reviews.submit(&student(), COURSE, rating, &text).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        prop_assert_eq!(err.reason(), "invalid rating");
        prop_assert!(reviews.for_course(COURSE).unwrap().is_empty());
    }

    #[test]
    fn in_range_rating_with_text_is_saved(rating in 1i32..=5) {
        let (reviews, ledger) = setup();
        record_purchase(&ledger, PurchaseStatus::Active);

        let review = reviews.submit(&student(), COURSE, rating, "Solid").unwrap();
        prop_assert_eq!(i32::from(review.rating), rating);
    }
}
