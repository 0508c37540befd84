use std::borrow::Cow;

/// Why a payment gateway refused a charge.
#[chub_derive::chub_error]
pub enum PaymentDecline {
    /// The payment method was refused.
    #[error("Charge declined{}: {message}", format_context(.context))]
    Declined { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The gateway could not be reached or is not configured.
    #[error("Payment gateway unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal payment error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
