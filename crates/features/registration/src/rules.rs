use crate::password::{meets_policy, verify_password};
use chrono::{DateTime, Duration, Utc};
use chub_domain::config::PasswordPolicy;
use chub_domain::identity::{Role, RoleSet};
use chub_domain::records::{ConfirmationState, RegistrationRecord};
use chub_kernel::error::RuleError;
use chub_kernel::pipeline::RuleChain;

#[derive(Debug)]
pub struct SignUp<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub confirmation: &'a str,
    pub role: Role,
    /// Looked up under the registration key before the chain runs.
    pub existing: Option<RegistrationRecord>,
    pub policy: &'a PasswordPolicy,
}

#[derive(Debug)]
pub struct Confirmation {
    pub record: Option<RegistrationRecord>,
    pub now: DateTime<Utc>,
    pub window: Duration,
}

#[derive(Debug)]
pub struct SignIn<'a> {
    pub password: &'a str,
    pub record: Option<RegistrationRecord>,
}

#[must_use]
pub fn register_chain<'a>() -> RuleChain<SignUp<'a>> {
    RuleChain::<SignUp<'a>>::new("registration.create")
        .rule("self-registrable role", self_registrable_role)
        .rule("email unused", |a| match a.existing {
            Some(_) => Err(RuleError::duplicate("email already in use")),
            None => Ok(()),
        })
        .rule("password policy", |a| {
            if meets_policy(a.policy, a.password) {
                Ok(())
            } else {
                Err(RuleError::invalid("password", "password format invalid"))
            }
        })
        .rule("passwords match", |a| {
            if a.password == a.confirmation {
                Ok(())
            } else {
                Err(RuleError::invalid("confirmation", "passwords do not match"))
            }
        })
}

#[must_use]
pub fn confirm_chain() -> RuleChain<Confirmation> {
    RuleChain::<Confirmation>::new("registration.confirm")
        .rule("registration exists", |c| registered(c.record.as_ref()).map(|_| ()))
        .rule("pending", pending)
        .rule("within window", within_window)
}

#[must_use]
pub fn login_chain<'a>() -> RuleChain<SignIn<'a>> {
    RuleChain::<SignIn<'a>>::new("registration.login")
        .rule("verified account", |s| match &s.record {
            Some(record) if record.is_confirmed() => Ok(()),
            _ => Err(RuleError::denied("email not verified")),
        })
        .rule("password matches", |s| match &s.record {
            Some(record) if verify_password(s.password, &record.password_hash) => Ok(()),
            _ => Err(RuleError::AuthenticationRequired {
                message: "invalid credentials".into(),
                context: None,
            }),
        })
}

/// The confirmation window is inclusive: a confirmation exactly at its end still succeeds.
#[must_use]
pub fn within_confirmation_window(
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    now - created_at <= window
}

fn self_registrable_role(a: &SignUp<'_>) -> Result<(), RuleError> {
    if RoleSet::SELF_REGISTERED.admits(a.role) {
        Ok(())
    } else {
        Err(RuleError::denied("unauthorized role"))
    }
}

fn registered(record: Option<&RegistrationRecord>) -> Result<&RegistrationRecord, RuleError> {
    record.ok_or_else(|| RuleError::not_found("account not found"))
}

fn pending(c: &Confirmation) -> Result<(), RuleError> {
    match registered(c.record.as_ref())?.state {
        ConfirmationState::Pending => Ok(()),
        ConfirmationState::Confirmed => Err(RuleError::duplicate("account already activated")),
        ConfirmationState::Expired => Err(RuleError::expired("confirmation expired")),
    }
}

fn within_window(c: &Confirmation) -> Result<(), RuleError> {
    let record = registered(c.record.as_ref())?;
    if within_confirmation_window(record.created_at, c.now, c.window) {
        Ok(())
    } else {
        Err(RuleError::expired("confirmation expired"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn window_boundary_is_inclusive() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        let window = Duration::minutes(15);

        assert!(within_confirmation_window(created, created, window));
        assert!(within_confirmation_window(created, created + window, window));
        assert!(!within_confirmation_window(
            created,
            created + window + Duration::milliseconds(1),
            window
        ));
    }
}
