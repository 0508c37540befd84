use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of reasons an action can be refused for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    AuthenticationRequired,
    AuthorizationDenied,
    NotFound,
    Duplicate,
    ValidationFailed,
    Expired,
    PaymentFailed,
    UnsupportedFileType,
    FileTooLarge,
    /// Persistence or collaborator fault, not a rule violation.
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationRequired => "authentication_required",
            Self::AuthorizationDenied => "authorization_denied",
            Self::NotFound => "not_found",
            Self::Duplicate => "duplicate",
            Self::ValidationFailed => "validation_failed",
            Self::Expired => "expired",
            Self::PaymentFailed => "payment_failed",
            Self::UnsupportedFileType => "unsupported_file_type",
            Self::FileTooLarge => "file_too_large",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
