use chub_ledger::LedgerError;
use chub_logger::LoggerError;
use std::borrow::Cow;

/// Failures while assembling a [`crate::RulesEngine`]. Rule outcomes are reported as
/// [`chub_kernel::error::RuleError`] instead.
#[chub_derive::chub_error]
pub enum EngineError {
    #[error("Ledger could not be opened{}: {source}", format_context(.context))]
    Ledger { source: LedgerError, context: Option<Cow<'static, str>> },

    #[error("Logger could not be initialized{}: {source}", format_context(.context))]
    Logger { source: LoggerError, context: Option<Cow<'static, str>> },

    #[error("Internal engine error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
