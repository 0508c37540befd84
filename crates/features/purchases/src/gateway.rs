//! Payment collaborator.

use crate::error::PaymentDecline;
use chub_domain::course::Course;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Proof of a successful charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub reference: String,
}

impl PaymentReceipt {
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self { reference: reference.into() }
    }
}

/// Charges a principal for a course. Called synchronously; any error refuses the purchase.
pub trait PaymentGateway: Debug + Send + Sync {
    /// # Errors
    /// Returns a [`PaymentDecline`] when the charge does not go through.
    fn charge(&self, principal: &str, course: &Course) -> Result<PaymentReceipt, PaymentDecline>;
}

/// The gateway used when none is wired: every charge is refused.
#[derive(Debug, Default, Clone, Copy)]
pub struct DecliningGateway;

impl PaymentGateway for DecliningGateway {
    fn charge(&self, _principal: &str, _course: &Course) -> Result<PaymentReceipt, PaymentDecline> {
        Err(PaymentDecline::Unavailable {
            message: "payment gateway not configured".into(),
            context: None,
        })
    }
}
