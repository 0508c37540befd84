use std::borrow::Cow;

/// A specialized [`LedgerError`] enum of this crate.
#[chub_derive::chub_error]
pub enum LedgerError {
    #[error("Duplicate ledger record{}: {message}", format_context(.context))]
    Duplicate { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Ledger record not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A record was written through a transaction opened for a different key.
    #[error("Ledger key mismatch{}: {message}", format_context(.context))]
    KeyMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The backing persistence store failed.
    #[error("Persistence store failure{}: {message}", format_context(.context))]
    Store { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal ledger error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
