//! Identity checks shared by every rule chain.

use crate::error::RuleError;
use chub_domain::identity::{Principal, RoleSet};

/// Stateless guard over a [`Principal`].
#[derive(Debug)]
pub struct AccessGuard;

impl AccessGuard {
    /// Returns the principal id when signed in.
    ///
    /// # Errors
    /// Returns [`RuleError::AuthenticationRequired`] for anonymous principals.
    pub fn require_authenticated(principal: &Principal) -> Result<&str, RuleError> {
        match principal.id() {
            Some(id) if principal.is_authenticated() => Ok(id),
            _ => Err(RuleError::authentication_required()),
        }
    }

    /// # Errors
    /// Returns [`RuleError::AuthorizationDenied`] with `reason` when the effective role is not
    /// in `allowed`.
    pub fn require_role(
        principal: &Principal,
        allowed: RoleSet,
        reason: &'static str,
    ) -> Result<(), RuleError> {
        if allowed.admits(principal.effective_role()) {
            Ok(())
        } else {
            Err(RuleError::denied(reason))
        }
    }

    /// # Errors
    /// Returns [`RuleError::AuthorizationDenied`] unless the principal id equals `owner`.
    pub fn require_owner(principal: &Principal, owner: &str) -> Result<(), RuleError> {
        if principal.id() == Some(owner) {
            Ok(())
        } else {
            Err(RuleError::denied("access denied"))
        }
    }
}
