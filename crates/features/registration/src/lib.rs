//! Registration feature slice.
//!
//! Visitors sign up with an email and a password, confirm the email within the configured
//! window and then log in. A registration that misses its window is marked expired for good.

mod error;
pub mod notifier;
pub mod password;
pub mod rules;

pub use crate::error::{NotifyError, NotifyErrorExt};
pub use crate::notifier::{LogNotifier, Notifier};

use crate::rules::{Confirmation, SignIn, SignUp, confirm_chain, login_chain, register_chain};
use chrono::Duration;
use chub_domain::config::PolicyConfig;
use chub_domain::identity::{Principal, Role};
use chub_domain::outcome::ErrorKind;
use chub_domain::records::{ConfirmationState, LedgerKey, Record, RegistrationRecord};
use chub_kernel::clock::Clock;
use chub_kernel::error::RuleError;
use chub_ledger::Ledger;
use std::sync::Arc;
use tracing::{info, warn};

/// What a visitor submits on the sign-up form.
#[derive(Debug, Clone)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirmation: String,
    pub role: Role,
}

impl SignUpForm {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        let password = password.into();
        Self { email: email.into(), confirmation: password.clone(), password, role }
    }

    #[must_use]
    pub fn with_confirmation(mut self, confirmation: impl Into<String>) -> Self {
        self.confirmation = confirmation.into();
        self
    }
}

/// Registration feature state.
#[chub_derive::chub_slice]
pub struct Registration {
    ledger: Ledger,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    policy: PolicyConfig,
}

/// Initialize the registration feature.
#[must_use]
pub fn init(
    ledger: Ledger,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    policy: PolicyConfig,
) -> Registration {
    info!(window_secs = policy.confirmation_window_secs, "Registration slice initialized");

    Registration::new(RegistrationInner { ledger, notifier, clock, policy })
}

impl Registration {
    /// Creates a pending registration and asks the notifier to send the confirmation email.
    ///
    /// A notifier failure is logged and does not undo the registration.
    ///
    /// # Errors
    /// * [`RuleError::AuthorizationDenied`] (`unauthorized role`) for admin sign-ups.
    /// * [`RuleError::Duplicate`] (`email already in use`).
    /// * [`RuleError::ValidationFailed`] (`password format invalid`, `passwords do not match`).
    pub fn register(&self, form: &SignUpForm) -> Result<RegistrationRecord, RuleError> {
        let key = LedgerKey::registration(&form.email);

        let record = self.ledger.transaction(key, |tx| -> Result<_, RuleError> {
            let attempt = SignUp {
                email: &form.email,
                password: &form.password,
                confirmation: &form.confirmation,
                role: form.role,
                existing: tx.current()?.and_then(|r| r.as_registration().cloned()),
                policy: &self.policy.password,
            };
            register_chain().evaluate(&attempt)?;

            let record = RegistrationRecord {
                email: form.email.clone(),
                password_hash: password::hash_password(&form.password),
                role: form.role,
                state: ConfirmationState::Pending,
                created_at: self.clock.now(),
                confirmed_at: None,
            };
            tx.insert(Record::Registration(record.clone()))?;
            info!(email = %record.email, role = %record.role, "Registration created");
            Ok(record)
        })?;

        if let Err(err) = self.notifier.send_confirmation(&record.email) {
            warn!(email = %record.email, error = %err, "Confirmation email could not be sent");
        }

        Ok(record)
    }

    /// Confirms the email of a pending registration.
    ///
    /// Confirming too late marks the registration [`ConfirmationState::Expired`]; there is no
    /// way back from that state.
    ///
    /// # Errors
    /// * [`RuleError::NotFound`] (`account not found`).
    /// * [`RuleError::Duplicate`] (`account already activated`).
    /// * [`RuleError::Expired`] (`confirmation expired`).
    pub fn confirm(&self, email: &str) -> Result<RegistrationRecord, RuleError> {
        let key = LedgerKey::registration(email);
        self.ledger.transaction(key, |tx| -> Result<_, RuleError> {
            let attempt = Confirmation {
                record: tx.current()?.and_then(|r| r.as_registration().cloned()),
                now: self.clock.now(),
                window: self.window(),
            };

            match (confirm_chain().evaluate(&attempt), attempt.record) {
                (Ok(()), Some(mut record)) => {
                    record.state = ConfirmationState::Confirmed;
                    record.confirmed_at = Some(attempt.now);
                    tx.replace(Record::Registration(record.clone()))?;
                    info!(email, "Account activated");
                    Ok(record)
                },
                (Err(err), Some(mut record))
                    if err.kind() == ErrorKind::Expired
                        && record.state == ConfirmationState::Pending =>
                {
                    record.state = ConfirmationState::Expired;
                    tx.replace(Record::Registration(record))?;
                    warn!(email, "Confirmation window missed, registration expired");
                    Err(err)
                },
                (Err(err), _) => Err(err),
                (Ok(()), None) => Err(RuleError::not_found("account not found")),
            }
        })
    }

    /// Signs a confirmed user in.
    ///
    /// # Errors
    /// * [`RuleError::AuthorizationDenied`] (`email not verified`) for unknown or unconfirmed
    ///   emails.
    /// * [`RuleError::AuthenticationRequired`] (`invalid credentials`) for a wrong password.
    pub fn login(&self, email: &str, password: &str) -> Result<Principal, RuleError> {
        let record = self.lookup(email)?;
        let attempt = SignIn { password, record };
        login_chain().evaluate(&attempt)?;

        let role = attempt.record.map_or(Role::Guest, |r| r.role);
        info!(email, role = %role, "Signed in");
        Ok(Principal::authenticated(email, role))
    }

    /// # Errors
    /// Returns [`RuleError::Ledger`] if the ledger cannot be read.
    pub fn lookup(&self, email: &str) -> Result<Option<RegistrationRecord>, RuleError> {
        let key = LedgerKey::registration(email);
        Ok(self.ledger.get(&key)?.and_then(|r| r.as_registration().cloned()))
    }

    fn window(&self) -> Duration {
        i64::try_from(self.policy.confirmation_window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}
