//! Review feature slice.

pub mod rules;

use crate::rules::{ReviewAttempt, review_chain};
use chub_domain::identity::Principal;
use chub_domain::records::{LedgerKey, Record, RecordKind, ReviewRecord};
use chub_kernel::clock::Clock;
use chub_kernel::error::RuleError;
use chub_ledger::Ledger;
use std::sync::Arc;
use tracing::info;

/// Review feature state.
#[chub_derive::chub_slice]
pub struct Reviews {
    ledger: Ledger,
    clock: Arc<dyn Clock>,
}

/// Initialize the review feature.
#[must_use]
pub fn init(ledger: Ledger, clock: Arc<dyn Clock>) -> Reviews {
    info!("Reviews slice initialized");

    Reviews::new(ReviewsInner { ledger, clock })
}

impl Reviews {
    /// Submits the principal's review of a purchased course.
    ///
    /// # Errors
    /// * [`RuleError::AuthenticationRequired`] when signed out.
    /// * [`RuleError::ValidationFailed`] with `not purchased`, `invalid rating` or
    ///   `review text required`, checked in that order.
    /// * [`RuleError::Duplicate`] (`review already exists`).
    pub fn submit(
        &self,
        principal: &Principal,
        course_id: &str,
        rating: i32,
        text: &str,
    ) -> Result<ReviewRecord, RuleError> {
        let author = principal.id().unwrap_or_default();
        let attempt = ReviewAttempt { principal, course_id, rating, text, ledger: &self.ledger };

        let key = LedgerKey::review(author, course_id);
        self.ledger.transaction(key, |tx| -> Result<_, RuleError> {
            review_chain().evaluate(&attempt)?;

            let rating = u8::try_from(rating).map_err(|e| RuleError::from(e.to_string()))?;
            let record = ReviewRecord {
                principal: author.to_owned(),
                course: course_id.to_owned(),
                rating,
                text: text.to_owned(),
                created_at: self.clock.now(),
            };
            tx.insert(Record::Review(record.clone()))?;

            info!(principal = author, course = course_id, rating, "Review saved");
            Ok(record)
        })
    }

    /// Reviews of a course, oldest first.
    ///
    /// # Errors
    /// Returns [`RuleError::Ledger`] if the ledger cannot be read.
    pub fn for_course(&self, course_id: &str) -> Result<Vec<ReviewRecord>, RuleError> {
        Ok(self
            .ledger
            .list_by_resource(RecordKind::Review, course_id)?
            .into_iter()
            .filter_map(|r| match r {
                Record::Review(review) => Some(review),
                _ => None,
            })
            .collect())
    }
}
