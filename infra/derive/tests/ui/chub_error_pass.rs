use chub_derive::chub_error;
use std::borrow::Cow;

#[chub_error]
pub enum UploadError {
    #[error("Unreadable upload{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal upload error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read_upload() -> Result<(), UploadError> {
    Err(std::io::Error::other("disk gone")).context("Reading material.pdf")
}

fn main() {
    let err = read_upload().unwrap_err();
    assert_eq!(err.to_string(), "Unreadable upload (Reading material.pdf): disk gone");

    let internal: UploadError = "broken invariant".into();
    assert!(matches!(internal, UploadError::Internal { context: None, .. }));
}
