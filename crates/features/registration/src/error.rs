use std::borrow::Cow;

/// Failure reported by a [`crate::Notifier`].
#[chub_derive::chub_error]
pub enum NotifyError {
    #[error("Confirmation delivery failed{}: {message}", format_context(.context))]
    Delivery { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal notifier error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
