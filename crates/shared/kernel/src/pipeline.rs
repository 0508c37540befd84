//! Ordered rule evaluation.
//!
//! A [`RuleChain`] is an ordered list of named checks over an action context `C`. Evaluation
//! stops at the first failing rule and returns its [`RuleError`]; later rules are not run, so
//! a rule with a side effect (charging a payment) only fires once everything before it holds.
//!
//! ```rust
//! use chub_kernel::error::RuleError;
//! use chub_kernel::pipeline::RuleChain;
//!
//! struct Rating(u8);
//!
//! let chain = RuleChain::new("review.rating")
//!     .rule("at least one", |r: &Rating| {
//!         if r.0 >= 1 { Ok(()) } else { Err(RuleError::invalid("rating", "invalid rating")) }
//!     })
//!     .rule("at most five", |r: &Rating| {
//!         if r.0 <= 5 { Ok(()) } else { Err(RuleError::invalid("rating", "invalid rating")) }
//!     });
//!
//! assert!(chain.evaluate(&Rating(3)).is_ok());
//! assert_eq!(chain.evaluate(&Rating(6)).unwrap_err().reason(), "invalid rating");
//! assert_eq!(chain.rule_names(), ["at least one", "at most five"]);
//! ```

use crate::error::RuleError;
use std::fmt;
use tracing::debug;

/// A single named check.
pub type Check<C> = fn(&C) -> Result<(), RuleError>;

struct Rule<C> {
    name: &'static str,
    check: Check<C>,
}

pub struct RuleChain<C> {
    action: &'static str,
    rules: Vec<Rule<C>>,
}

impl<C> RuleChain<C> {
    #[must_use]
    pub const fn new(action: &'static str) -> Self {
        Self { action, rules: Vec::new() }
    }

    /// Appends a rule; rules run in the order they were added.
    #[must_use]
    pub fn rule(mut self, name: &'static str, check: Check<C>) -> Self {
        self.rules.push(Rule { name, check });
        self
    }

    #[must_use]
    pub const fn action(&self) -> &'static str {
        self.action
    }

    /// Rule names in evaluation order.
    #[must_use]
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Runs the rules in order.
    ///
    /// # Errors
    /// Returns the error of the first rule that fails.
    pub fn evaluate(&self, ctx: &C) -> Result<(), RuleError> {
        for rule in &self.rules {
            if let Err(err) = (rule.check)(ctx) {
                debug!(
                    action = self.action,
                    rule = rule.name,
                    kind = %err.kind(),
                    reason = err.reason(),
                    "Rule refused"
                );
                return Err(err);
            }
            debug!(action = self.action, rule = rule.name, "Rule passed");
        }
        Ok(())
    }
}

impl<C> fmt::Debug for RuleChain<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleChain")
            .field("action", &self.action)
            .field("rules", &self.rule_names())
            .finish()
    }
}
