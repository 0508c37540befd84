//! Purchase feature slice.
//!
//! Buying a course charges the injected [`PaymentGateway`] and, only when the charge succeeds,
//! records an active purchase together with an append-only transaction entry. An active
//! purchase unlocks the course materials and assessments.

mod error;
pub mod gateway;
pub mod rules;

pub use crate::error::{PaymentDecline, PaymentDeclineExt};
pub use crate::gateway::{DecliningGateway, PaymentGateway, PaymentReceipt};

use crate::rules::{ContentAccess, PurchaseAttempt, access_chain, purchase_chain};
use chub_catalog::CatalogView;
use chub_domain::course::Course;
use chub_domain::identity::Principal;
use chub_domain::records::{
    LedgerKey, PurchaseRecord, PurchaseStatus, Record, RecordKind, TransactionRecord,
};
use chub_kernel::clock::Clock;
use chub_kernel::error::{RuleError, RuleErrorExt};
use chub_kernel::safe_nanoid;
use chub_kernel::security::access::AccessGuard;
use chub_ledger::{Ledger, LedgerError};
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::{info, warn};

/// Purchase feature state.
#[chub_derive::chub_slice]
pub struct Purchases {
    ledger: Ledger,
    catalog: Arc<dyn CatalogView>,
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
}

/// Initialize the purchase feature.
#[must_use]
pub fn init(
    ledger: Ledger,
    catalog: Arc<dyn CatalogView>,
    gateway: Arc<dyn PaymentGateway>,
    clock: Arc<dyn Clock>,
) -> Purchases {
    info!(gateway = ?gateway, "Purchases slice initialized");

    Purchases::new(PurchasesInner { ledger, catalog, gateway, clock })
}

impl Purchases {
    /// Buys `course_id` for the principal.
    ///
    /// The gateway is only charged once every earlier rule holds, and the purchase key stays
    /// owned from the duplicate check through the write, so a course is never charged twice
    /// for concurrent submissions.
    ///
    /// # Errors
    /// * [`RuleError::AuthenticationRequired`] when signed out.
    /// * [`RuleError::NotFound`] (`course not found`).
    /// * [`RuleError::Duplicate`] (`already purchased`).
    /// * [`RuleError::PaymentFailed`] (`payment failed`).
    /// * [`RuleError::Ledger`] if the purchase or its audit entry cannot be written. Nothing
    ///   stays recorded for the attempt in that case.
    pub fn purchase(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<PurchaseRecord, RuleError> {
        let buyer = principal.id().unwrap_or_default();
        let attempt = PurchaseAttempt {
            principal,
            course: self.catalog.course(course_id),
            ledger: &self.ledger,
            gateway: self.gateway.as_ref(),
            receipt: OnceCell::new(),
        };

        let key = LedgerKey::purchase(buyer, course_id);
        self.ledger.transaction(key, |tx| -> Result<_, RuleError> {
            purchase_chain().evaluate(&attempt)?;
            let receipt = attempt.receipt.get().ok_or("payment rule left no receipt")?;

            let prior = tx.current_entry()?;
            let now = self.clock.now();
            let record = PurchaseRecord {
                principal: buyer.to_owned(),
                course: course_id.to_owned(),
                status: PurchaseStatus::Active,
                purchased_at: now,
                payment_reference: receipt.reference.clone(),
            };
            tx.insert(Record::Purchase(record.clone()))?;

            let entry = TransactionRecord {
                id: safe_nanoid!(),
                principal: buyer.to_owned(),
                course: course_id.to_owned(),
                payment_reference: receipt.reference.clone(),
                recorded_at: now,
            };
            let audit = self
                .ledger
                .put(Record::Transaction(entry))
                .context("Appending purchase audit entry");
            if let Err(err) = audit {
                warn!(
                    principal = buyer,
                    course = course_id,
                    reference = %receipt.reference,
                    "Audit append failed, purchase rolled back"
                );
                tx.restore(prior)?;
                return Err(err);
            }

            info!(
                principal = buyer,
                course = course_id,
                reference = %receipt.reference,
                "Course purchased"
            );
            Ok(record)
        })
    }

    /// Marks an active purchase refunded. Driven by the refund collaborator, not by users.
    ///
    /// # Errors
    /// Returns [`RuleError::NotFound`] (`not purchased`) without an active purchase.
    pub fn refund(&self, principal_id: &str, course_id: &str) -> Result<PurchaseRecord, RuleError> {
        match self.ledger.refund(principal_id, course_id) {
            Ok(record) => {
                info!(principal = principal_id, course = course_id, "Purchase refunded");
                Ok(record)
            },
            Err(LedgerError::NotFound { .. }) => {
                warn!(
                    principal = principal_id,
                    course = course_id,
                    "Refund without active purchase"
                );
                Err(RuleError::not_found("not purchased"))
            },
            Err(err) => Err(err.into()),
        }
    }

    /// # Errors
    /// Returns [`RuleError::Ledger`] if the ledger cannot be read.
    pub fn has_active_purchase(
        &self,
        principal_id: &str,
        course_id: &str,
    ) -> Result<bool, RuleError> {
        rules::has_active_purchase(&self.ledger, principal_id, course_id)
    }

    /// Material file names of a purchased course.
    ///
    /// # Errors
    /// * [`RuleError::AuthenticationRequired`] when signed out.
    /// * [`RuleError::NotFound`] (`course not found`).
    /// * [`RuleError::AuthorizationDenied`] (`not purchased`).
    pub fn materials(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<Vec<String>, RuleError> {
        Ok(self.unlocked(principal, course_id)?.materials)
    }

    /// Assessment names of a purchased course.
    ///
    /// # Errors
    /// Same as [`Purchases::materials`].
    pub fn assessments(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<Vec<String>, RuleError> {
        Ok(self.unlocked(principal, course_id)?.assessments)
    }

    /// The principal's purchase audit trail, oldest first.
    ///
    /// # Errors
    /// Returns [`RuleError::AuthenticationRequired`] when signed out.
    pub fn transactions(&self, principal: &Principal) -> Result<Vec<TransactionRecord>, RuleError> {
        let id = AccessGuard::require_authenticated(principal)?;
        Ok(self
            .ledger
            .list_by_principal(RecordKind::Transaction, id)?
            .into_iter()
            .filter_map(|r| match r {
                Record::Transaction(t) => Some(t),
                _ => None,
            })
            .collect())
    }

    fn unlocked(
        &self,
        principal: &Principal,
        course_id: &str,
    ) -> Result<Course, RuleError> {
        let course = self.catalog.course(course_id);
        let access = ContentAccess { principal, course, ledger: &self.ledger };
        access_chain().evaluate(&access)?;
        access.course.ok_or_else(|| RuleError::not_found("course not found"))
    }
}
