use chub_catalog::*;
use chub_domain::config::EngineConfig;
use chub_domain::constants::MEBIBYTE;
use chub_domain::course::CourseStatus;
use chub_domain::identity::{Principal, Role};
use chub_domain::outcome::ErrorKind;
use std::sync::Arc;

fn catalog() -> (Catalog, Arc<InMemoryCatalog>) {
    let store = Arc::new(InMemoryCatalog::new());
    (init(store.clone(), &EngineConfig::default()), store)
}

fn educator() -> Principal {
    Principal::authenticated("educator@example.com", Role::Educator)
}

#[test]
fn educator_publishes_a_course() {
    let (catalog, store) = catalog();
    let draft = CourseDraft::new("New Course Title", "Course description")
        .with_material(FileUpload::new("material1.pdf", 5 * MEBIBYTE))
        .with_material(FileUpload::new("material2.docx", 8 * MEBIBYTE));

    let course = catalog.create_course(&educator(), &draft).unwrap();

    assert_eq!(course.status, CourseStatus::Published);
    assert_eq!(course.owner.as_deref(), Some("educator@example.com"));
    assert_eq!(course.materials, ["material1.pdf", "material2.docx"]);
    assert_eq!(store.len(), 1);
    assert_eq!(catalog.course(&course.id), Some(course));
}

#[test]
fn empty_title_is_rejected() {
    let (catalog, store) = catalog();

    let err = catalog.create_course(&educator(), &CourseDraft::new("  ", "Some description")).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(err.reason(), "title is required");
    assert!(store.is_empty());
}

#[test]
fn students_cannot_author() {
    let (catalog, _) = catalog();
    let student = Principal::authenticated("student@example.com", Role::Student);

    let err = catalog.create_course(&student, &CourseDraft::new("Title", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);
    assert_eq!(err.reason(), "access denied");

    let err = catalog.save_draft(&student, &CourseDraft::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthorizationDenied);
}

#[test]
fn signed_out_visitors_must_log_in_first() {
    let (catalog, _) = catalog();
    let err = catalog.create_course(&Principal::anonymous(), &CourseDraft::new("Title", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthenticationRequired);
}

#[test]
fn admin_saves_untitled_draft() {
    let (catalog, _) = catalog();
    let admin = Principal::authenticated("admin@example.com", Role::Admin);

    let course = catalog.save_draft(&admin, &CourseDraft::default()).unwrap();

    assert_eq!(course.status, CourseStatus::Draft);
    assert_eq!(course.title, "Untitled Draft");
}

#[test]
fn oversized_material_blocks_publication() {
    let (catalog, store) = catalog();
    let draft = CourseDraft::new("Heavy", "").with_material(FileUpload::new("big.pdf", 11 * MEBIBYTE));

    let err = catalog.create_course(&educator(), &draft).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileTooLarge);
    assert!(store.is_empty());
}

#[test]
fn upload_rules() {
    let (catalog, _) = catalog();

    assert_eq!(
        catalog.validate_upload(&FileUpload::new("material1.pdf", 5 * MEBIBYTE), UploadScope::Material).unwrap(),
        UploadVerdict::Accepted
    );
    assert!(catalog.validate_upload(&FileUpload::new("Notes.DOCX", MEBIBYTE), UploadScope::General).is_ok());

    let err = catalog.validate_upload(&FileUpload::new("virus.exe", MEBIBYTE), UploadScope::General).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFileType);

    let err = catalog.validate_upload(&FileUpload::new("noextension", 1), UploadScope::General).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFileType);

    let err = catalog
        .validate_upload(&FileUpload::new("largefile.pdf", 51 * MEBIBYTE), UploadScope::General)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileTooLarge);
    assert_eq!(err.reason(), "file too large");

    assert!(catalog.validate_upload(&FileUpload::new("edge.pdf", 50 * MEBIBYTE), UploadScope::General).is_ok());
    assert!(catalog.validate_upload(&FileUpload::new("edge.pdf", 10 * MEBIBYTE), UploadScope::Material).is_ok());
}

#[test]
fn type_is_checked_before_size() {
    let (catalog, _) = catalog();
    let err = catalog
        .validate_upload(&FileUpload::new("huge.exe", 100 * MEBIBYTE), UploadScope::General)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFileType);
}
