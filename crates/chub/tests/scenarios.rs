use chrono::{Duration, TimeZone, Utc};
use chub::RulesEngine;
use chub::domain::course::{Course, CourseStatus};
use chub::domain::identity::{Principal, Role};
use chub::domain::outcome::ErrorKind;
use chub::domain::registry::InitializedSlice;
use chub::features::catalog::{CourseDraft, FileUpload, InMemoryCatalog, ListingQuery, UploadScope};
use chub::features::purchases::{PaymentDecline, PaymentGateway, PaymentReceipt};
use chub::features::registration::SignUpForm;
use chub::kernel::clock::ManualClock;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Default)]
struct ApprovingGateway {
    charged: Mutex<Vec<String>>,
}

impl PaymentGateway for ApprovingGateway {
    fn charge(&self, principal: &str, course: &Course) -> Result<PaymentReceipt, PaymentDecline> {
        let mut charged = self.charged.lock();
        charged.push(format!("{principal}:{}", course.id));
        Ok(PaymentReceipt::new(format!("pay-{}", charged.len())))
    }
}

struct Platform {
    engine: RulesEngine,
    clock: Arc<ManualClock>,
    gateway: Arc<ApprovingGateway>,
}

fn catalog() -> InMemoryCatalog {
    let mut courses = vec![
        Course::new("course-101", "Intro to Rust")
            .with_category("Programming")
            .with_materials(["syllabus.pdf"])
            .with_assessments(["quiz-1"]),
        Course::new("course-102", "Advanced Rust").with_category("Programming"),
        Course::new("course-103", "Watercolor Basics").with_category("Art"),
        Course::new("course-104", "Members Only").with_public(false),
        Course::new("course-105", "Unreleased")
            .with_status(CourseStatus::Draft)
            .with_owner("teacher@example.com"),
    ];
    courses.extend((1..=25).map(|i| Course::new(format!("bulk-{i:02}"), format!("Bulk {i}")).with_category("Bulk")));
    InMemoryCatalog::from_courses(courses)
}

fn platform() -> Platform {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()));
    let gateway = Arc::new(ApprovingGateway::default());
    let engine = RulesEngine::builder()
        .catalog(Arc::new(catalog()))
        .clock(clock.clone())
        .payments(gateway.clone())
        .build()
        .unwrap();
    Platform { engine, clock, gateway }
}

fn student() -> Principal {
    Principal::authenticated("student@example.com", Role::Student)
}

#[test]
fn anonymous_visitor_logs_in_to_bookmark() {
    let p = platform();

    let err = p.engine.bookmark(&Principal::anonymous(), "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
    assert_eq!(p.engine.bookmark_count("course-101").unwrap(), 0);

    let record = p.engine.bookmark(&student(), "course-101").unwrap();
    assert_eq!(record.principal, "student@example.com");
    assert_eq!(p.engine.bookmark_count("course-101").unwrap(), 1);

    let err = p.engine.bookmark(&student(), "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(p.engine.bookmark_count("course-101").unwrap(), 1);
}

#[test]
fn bookmark_removal_rules() {
    let p = platform();

    let err = p.engine.remove_bookmark(&student(), "student@example.com", "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    p.engine.bookmark(&student(), "course-101").unwrap();
    let intruder = Principal::authenticated("other@example.com", Role::Student);
    let err = p.engine.remove_bookmark(&intruder, "student@example.com", "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);

    p.engine.remove_bookmark(&student(), "student@example.com", "course-101").unwrap();
    assert!(p.engine.bookmarks(&student()).unwrap().is_empty());
}

#[test]
fn concurrent_bookmarks_leave_one_record() {
    let p = platform();

    let successes = std::thread::scope(|s| {
        let handles: Vec<_> =
            (0..8).map(|_| s.spawn(|| p.engine.bookmark(&student(), "course-102").is_ok())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).filter(|ok| *ok).count()
    });

    assert_eq!(successes, 1);
    assert_eq!(p.engine.bookmark_count("course-102").unwrap(), 1);
}

#[test]
fn listing_pagination_examples() {
    let p = platform();
    let bulk = ListingQuery::default().category("Bulk");

    let third = p.engine.list_courses(&student(), &bulk.clone().page(3, 10)).unwrap();
    assert_eq!(third.total, 25);
    assert_eq!(third.items.len(), 5);
    assert_eq!(third.items[0].id, "bulk-21");

    let tenth = p.engine.list_courses(&student(), &bulk.page(10, 10)).unwrap();
    assert!(tenth.items.is_empty());
}

#[test]
fn bookmarked_courses_come_first() {
    let p = platform();
    p.engine.bookmark(&student(), "course-103").unwrap();
    p.engine.bookmark(&student(), "course-101").unwrap();

    let page = p.engine.list_courses(&student(), &ListingQuery::default().page(1, 5)).unwrap();
    let ids: Vec<&str> = page.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["course-101", "course-103", "course-102", "course-104", "bulk-01"]);

    let anonymous = p.engine.list_courses(&Principal::anonymous(), &ListingQuery::default().page(1, 3)).unwrap();
    let ids: Vec<&str> = anonymous.items.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["course-101", "course-102", "course-103"]);
}

#[test]
fn search_respects_visibility() {
    let p = platform();

    let page = p.engine.list_courses(&Principal::anonymous(), &ListingQuery::default().search("rust")).unwrap();
    assert_eq!(page.total, 2);

    let hidden = p.engine.list_courses(&Principal::anonymous(), &ListingQuery::default().search("members")).unwrap();
    assert_eq!(hidden.total, 0);

    let teacher = Principal::authenticated("teacher@example.com", Role::Educator);
    let own = p.engine.list_courses(&teacher, &ListingQuery::default().search("unreleased")).unwrap();
    assert_eq!(own.total, 1);
}

#[test]
fn review_requires_purchase() {
    let p = platform();

    let err = p.engine.review(&student(), "course-101", 5, "Great course").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert!(p.gateway.charged.lock().is_empty());

    let purchase = p.engine.purchase(&student(), "course-101").unwrap();
    assert_eq!(purchase.payment_reference, "pay-1");

    let err = p.engine.review(&student(), "course-101", 6, "Great course").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    let err = p.engine.review(&student(), "course-101", 0, "").unwrap_err();
    assert_eq!(err.reason(), "invalid rating");

    p.engine.review(&student(), "course-101", 5, "Great course").unwrap();
    let err = p.engine.review(&student(), "course-101", 4, "Changed my mind").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(p.engine.reviews("course-101").unwrap().len(), 1);
}

#[test]
fn purchase_unlocks_content_and_is_audited() {
    let p = platform();

    let err = p.engine.materials(&student(), "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);

    p.engine.purchase(&student(), "course-101").unwrap();
    assert_eq!(p.engine.materials(&student(), "course-101").unwrap(), ["syllabus.pdf"]);
    assert_eq!(p.engine.assessments(&student(), "course-101").unwrap(), ["quiz-1"]);
    assert_eq!(p.engine.transactions(&student()).unwrap().len(), 1);

    let err = p.engine.purchase(&student(), "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(p.gateway.charged.lock().len(), 1);

    p.engine.refund("student@example.com", "course-101").unwrap();
    assert!(!p.engine.has_active_purchase("student@example.com", "course-101").unwrap());
    assert_eq!(p.engine.materials(&student(), "course-101").unwrap_err().kind(), ErrorKind::AuthorizationDenied);
}

#[test]
fn default_gateway_refuses_purchases() {
    let engine = RulesEngine::builder().catalog(Arc::new(catalog())).build().unwrap();

    let err = engine.purchase(&student(), "course-101").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PaymentFailed);
    assert!(!engine.has_active_purchase("student@example.com", "course-101").unwrap());
}

#[test]
fn registration_window_and_login() {
    let p = platform();
    let form = SignUpForm::new("new@example.com", "Valid123!", Role::Student);

    p.engine.register(&form).unwrap();
    p.clock.advance(Duration::minutes(15));
    p.engine.confirm_registration("new@example.com").unwrap();

    let principal = p.engine.login("new@example.com", "Valid123!").unwrap();
    assert_eq!(principal.role(), Role::Student);
    p.engine.bookmark(&principal, "course-101").unwrap();

    p.engine.register(&SignUpForm::new("late@example.com", "Valid123!", Role::Student)).unwrap();
    p.clock.advance(Duration::minutes(16));
    let err = p.engine.confirm_registration("late@example.com").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Expired);
    assert_eq!(p.engine.login("late@example.com", "Valid123!").unwrap_err().reason(), "email not verified");
}

#[test]
fn password_examples() {
    let p = platform();

    let weak = p.engine.register(&SignUpForm::new("weak@example.com", "abc", Role::Student)).unwrap_err();
    assert_eq!(weak.reason(), "password format invalid");

    let mismatch = SignUpForm::new("mismatch@example.com", "Valid123!", Role::Student)
        .with_confirmation("Mismatch456!");
    assert_eq!(p.engine.register(&mismatch).unwrap_err().reason(), "passwords do not match");

    let admin = p.engine.register(&SignUpForm::new("admin@public.com", "Valid123!", Role::Admin)).unwrap_err();
    assert_eq!(admin.kind(), ErrorKind::AuthorizationDenied);
}

#[test]
fn upload_examples() {
    let p = platform();
    let mib = 1024 * 1024;

    assert!(p.engine.validate_upload(&FileUpload::new("notes.pdf", 5 * mib), UploadScope::Material).is_ok());

    let err = p.engine.validate_upload(&FileUpload::new("video.mp4", mib), UploadScope::Material).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFileType);

    let err = p.engine.validate_upload(&FileUpload::new("large.pdf", 11 * mib), UploadScope::Material).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileTooLarge);

    assert!(p.engine.validate_upload(&FileUpload::new("large.pdf", 11 * mib), UploadScope::General).is_ok());
}

#[test]
fn educator_authoring() {
    let p = platform();
    let teacher = Principal::authenticated("teacher@example.com", Role::Educator);

    let course = p.engine.create_course(&teacher, &CourseDraft::new("Rust for Teachers", "Ownership")).unwrap();
    assert_eq!(course.owner.as_deref(), Some("teacher@example.com"));
    assert_eq!(p.engine.course(&course.id), Some(course.clone()));
    assert_eq!(p.engine.search("for teachers").len(), 1);

    let err = p.engine.create_course(&student(), &CourseDraft::new("Nope", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);

    let draft = p.engine.save_draft(&teacher, &CourseDraft::new("", "")).unwrap();
    assert_eq!(draft.status, CourseStatus::Draft);
    assert_eq!(draft.title, p.engine.config().policy.draft_title);
}

#[test]
fn slices_are_registered() {
    let p = platform();

    let slices: Vec<InitializedSlice> = p.engine.slices();

    assert_eq!(slices.len(), 5);
    assert!(slices.iter().any(|s| s.downcast_ref::<chub::features::bookmarks::Bookmarks>().is_some()));
}
