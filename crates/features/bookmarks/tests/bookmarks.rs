use chub_bookmarks::rules::{create_chain, remove_chain};
use chub_bookmarks::*;
use chub_catalog::InMemoryCatalog;
use chub_domain::course::Course;
use chub_domain::identity::{Principal, Role};
use chub_domain::outcome::ErrorKind;
use chub_kernel::clock::SystemClock;
use chub_ledger::Ledger;
use std::sync::Arc;

fn bookmarks() -> Bookmarks {
    let catalog = InMemoryCatalog::from_courses([
        Course::new("course-1", "Rust for beginners"),
        Course::new("course-2", "Advanced Rust"),
    ]);
    init(Ledger::in_memory(), Arc::new(catalog), Arc::new(SystemClock))
}

fn user(email: &str) -> Principal {
    Principal::authenticated(email, Role::Student)
}

#[test]
fn signed_out_visitor_is_asked_to_log_in_then_succeeds() {
    let bookmarks = bookmarks();

    let err = bookmarks.create(&Principal::anonymous(), "course-1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
    assert_eq!(err.reason(), "login required");
    assert_eq!(bookmarks.count("course-1").unwrap(), 0);

    let record = bookmarks.create(&user("user@example.com"), "course-1").unwrap();
    assert_eq!(record.course, "course-1");
    assert_eq!(bookmarks.count("course-1").unwrap(), 1);
}

#[test]
fn second_bookmark_is_a_duplicate() {
    let bookmarks = bookmarks();
    let user = user("user@example.com");

    bookmarks.create(&user, "course-1").unwrap();
    let err = bookmarks.create(&user, "course-1").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(err.reason(), "already bookmarked");
    assert_eq!(bookmarks.list(&user).unwrap().len(), 1);
}

#[test]
fn unknown_course_is_not_found() {
    let err = bookmarks().create(&user("user@example.com"), "course-404").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.reason(), "course not found");
}

#[test]
fn removing_a_missing_bookmark_is_not_found() {
    let bookmarks = bookmarks();
    let user = user("user@example.com");

    let err = bookmarks.remove(&user, "user@example.com", "course-1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.reason(), "bookmark not found");
}

#[test]
fn only_the_owner_may_remove() {
    let bookmarks = bookmarks();
    let owner = user("user1@example.com");
    let intruder = user("user2@example.com");
    bookmarks.create(&owner, "course-1").unwrap();

    let err = bookmarks.remove(&intruder, "user1@example.com", "course-1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);
    assert_eq!(err.reason(), "access denied");
    assert_eq!(bookmarks.count("course-1").unwrap(), 1);

    bookmarks.remove(&owner, "user1@example.com", "course-1").unwrap();
    assert_eq!(bookmarks.count("course-1").unwrap(), 0);
}

#[test]
fn listing_keeps_bookmark_order() {
    let bookmarks = bookmarks();
    let user = user("user@example.com");
    bookmarks.create(&user, "course-2").unwrap();
    bookmarks.create(&user, "course-1").unwrap();

    let courses: Vec<String> = bookmarks.list(&user).unwrap().into_iter().map(|b| b.course).collect();
    assert_eq!(courses, ["course-2", "course-1"]);

    assert!(bookmarks.bookmarked_courses(&Principal::anonymous()).unwrap().is_empty());
    assert_eq!(bookmarks.bookmarked_courses(&user).unwrap().len(), 2);
}

#[test]
fn concurrent_submissions_store_one_bookmark() {
    let bookmarks = bookmarks();
    let user = user("user@example.com");

    let outcomes: Vec<Result<_, _>> = std::thread::scope(|s| {
        let handles: Vec<_> =
            (0..12).map(|_| s.spawn(|| bookmarks.create(&user, "course-1"))).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.iter().filter(|o| o.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .filter_map(|o| o.as_ref().err())
            .all(|e| e.kind() == ErrorKind::Duplicate)
    );
    assert_eq!(bookmarks.count("course-1").unwrap(), 1);
}

#[test]
fn rule_order() {
    assert_eq!(create_chain().rule_names(), ["authenticated", "course exists", "not bookmarked"]);
    assert_eq!(remove_chain().rule_names(), ["authenticated", "bookmark exists", "owner"]);
}
