use crate::error::NotifyError;
use std::fmt::Debug;
use tracing::info;

/// Delivers confirmation requests. Fire-and-forget: a failure never undoes a registration.
pub trait Notifier: Debug + Send + Sync {
    /// # Errors
    /// Returns [`NotifyError`] when the request could not be handed off.
    fn send_confirmation(&self, email: &str) -> Result<(), NotifyError>;
}

/// Writes the confirmation request to the log instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send_confirmation(&self, email: &str) -> Result<(), NotifyError> {
        info!(email, "Confirmation email requested");
        Ok(())
    }
}
