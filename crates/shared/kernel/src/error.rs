use chub_domain::outcome::ErrorKind;
use chub_ledger::LedgerError;
use std::borrow::Cow;

type Reason = Cow<'static, str>;

/// The refusal returned by a rule chain. The first failing rule decides the variant.
///
/// `message` always holds the stable, user-facing reason (for instance `"already bookmarked"`);
/// `context` is free-form diagnostic detail and is never shown to users.
#[chub_derive::chub_error]
pub enum RuleError {
    #[error("Authentication required{}: {message}", format_context(.context))]
    AuthenticationRequired { message: Reason, context: Option<Cow<'static, str>> },

    #[error("Authorization denied{}: {message}", format_context(.context))]
    AuthorizationDenied { message: Reason, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Reason, context: Option<Cow<'static, str>> },

    #[error("Duplicate{}: {message}", format_context(.context))]
    Duplicate { message: Reason, context: Option<Cow<'static, str>> },

    #[error("Validation failed on '{field}'{}: {message}", format_context(.context))]
    ValidationFailed {
        field: &'static str,
        message: Reason,
        context: Option<Cow<'static, str>>,
    },

    #[error("Expired{}: {message}", format_context(.context))]
    Expired { message: Reason, context: Option<Cow<'static, str>> },

    #[error("Payment failed{}: {message}", format_context(.context))]
    PaymentFailed { message: Reason, context: Option<Cow<'static, str>> },

    #[error("Unsupported file type{}: {message}", format_context(.context))]
    UnsupportedFileType { message: Reason, context: Option<Cow<'static, str>> },

    #[error("File too large{}: {message}", format_context(.context))]
    FileTooLarge { message: Reason, context: Option<Cow<'static, str>> },

    #[error("Ledger failure{}: {source}", format_context(.context))]
    Ledger { source: LedgerError, context: Option<Cow<'static, str>> },

    /// Collaborator or programming fault; not a rule violation.
    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Reason, context: Option<Cow<'static, str>> },
}

impl RuleError {
    #[must_use]
    pub fn authentication_required() -> Self {
        Self::AuthenticationRequired { message: "login required".into(), context: None }
    }

    #[must_use]
    pub fn denied(reason: impl Into<Reason>) -> Self {
        Self::AuthorizationDenied { message: reason.into(), context: None }
    }

    #[must_use]
    pub fn not_found(reason: impl Into<Reason>) -> Self {
        Self::NotFound { message: reason.into(), context: None }
    }

    #[must_use]
    pub fn duplicate(reason: impl Into<Reason>) -> Self {
        Self::Duplicate { message: reason.into(), context: None }
    }

    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<Reason>) -> Self {
        Self::ValidationFailed { field, message: reason.into(), context: None }
    }

    #[must_use]
    pub fn expired(reason: impl Into<Reason>) -> Self {
        Self::Expired { message: reason.into(), context: None }
    }

    #[must_use]
    pub fn payment_failed(reason: impl Into<Reason>) -> Self {
        Self::PaymentFailed { message: reason.into(), context: None }
    }

    #[must_use]
    pub fn unsupported_file_type(reason: impl Into<Reason>) -> Self {
        Self::UnsupportedFileType { message: reason.into(), context: None }
    }

    #[must_use]
    pub fn file_too_large(reason: impl Into<Reason>) -> Self {
        Self::FileTooLarge { message: reason.into(), context: None }
    }

    /// The closed category of this refusal.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationRequired { .. } => ErrorKind::AuthenticationRequired,
            Self::AuthorizationDenied { .. } => ErrorKind::AuthorizationDenied,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Duplicate { .. } => ErrorKind::Duplicate,
            Self::ValidationFailed { .. } => ErrorKind::ValidationFailed,
            Self::Expired { .. } => ErrorKind::Expired,
            Self::PaymentFailed { .. } => ErrorKind::PaymentFailed,
            Self::UnsupportedFileType { .. } => ErrorKind::UnsupportedFileType,
            Self::FileTooLarge { .. } => ErrorKind::FileTooLarge,
            Self::Ledger { source: LedgerError::Duplicate { .. }, .. } => ErrorKind::Duplicate,
            Self::Ledger { source: LedgerError::NotFound { .. }, .. } => ErrorKind::NotFound,
            Self::Ledger { .. } | Self::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// The stable user-facing reason text.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::AuthenticationRequired { message, .. }
            | Self::AuthorizationDenied { message, .. }
            | Self::NotFound { message, .. }
            | Self::Duplicate { message, .. }
            | Self::ValidationFailed { message, .. }
            | Self::Expired { message, .. }
            | Self::PaymentFailed { message, .. }
            | Self::UnsupportedFileType { message, .. }
            | Self::FileTooLarge { message, .. } => message,
            Self::Ledger { source: LedgerError::Duplicate { .. }, .. } => "duplicate record",
            Self::Ledger { source: LedgerError::NotFound { .. }, .. } => "record not found",
            Self::Ledger { .. } | Self::Internal { .. } => "internal error",
        }
    }
}
