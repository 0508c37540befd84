//! Interaction records kept by the ledger.
//!
//! Every record knows its own [`LedgerKey`]; the key is the unit of uniqueness and of
//! write serialization.

use crate::constants::{ACCOUNT, BOOKMARK, PURCHASE, REGISTRATION, REVIEW, TRANSACTION};
use crate::identity::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Bookmark,
    Purchase,
    Review,
    Registration,
    Transaction,
}

impl RecordKind {
    pub const ALL: [Self; 5] =
        [Self::Bookmark, Self::Purchase, Self::Review, Self::Registration, Self::Transaction];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bookmark => BOOKMARK,
            Self::Purchase => PURCHASE,
            Self::Review => REVIEW,
            Self::Registration => REGISTRATION,
            Self::Transaction => TRANSACTION,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite key `(kind, principal, resource)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LedgerKey {
    pub kind: RecordKind,
    pub principal: String,
    pub resource: String,
}

impl LedgerKey {
    #[must_use]
    pub fn new(
        kind: RecordKind,
        principal: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self { kind, principal: principal.into(), resource: resource.into() }
    }

    #[must_use]
    pub fn bookmark(principal: &str, course: &str) -> Self {
        Self::new(RecordKind::Bookmark, principal, course)
    }

    #[must_use]
    pub fn purchase(principal: &str, course: &str) -> Self {
        Self::new(RecordKind::Purchase, principal, course)
    }

    #[must_use]
    pub fn review(principal: &str, course: &str) -> Self {
        Self::new(RecordKind::Review, principal, course)
    }

    #[must_use]
    pub fn registration(email: &str) -> Self {
        Self::new(RecordKind::Registration, email, ACCOUNT)
    }
}

impl fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.kind, self.principal, self.resource)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    pub principal: String,
    pub course: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Active,
    Refunded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRecord {
    pub principal: String,
    pub course: String,
    pub status: PurchaseStatus,
    pub purchased_at: DateTime<Utc>,
    /// Reference handed back by the payment gateway.
    pub payment_reference: String,
}

impl PurchaseRecord {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == PurchaseStatus::Active
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub principal: String,
    pub course: String,
    /// Always within `1..=5`.
    pub rating: u8,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationState {
    Pending,
    Confirmed,
    /// Terminal: the confirmation window was missed.
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub state: ConfirmationState,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl RegistrationRecord {
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.state == ConfirmationState::Confirmed
    }
}

/// Purchase audit entry. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub principal: String,
    pub course: String,
    pub payment_reference: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    Bookmark(BookmarkRecord),
    Purchase(PurchaseRecord),
    Review(ReviewRecord),
    Registration(RegistrationRecord),
    Transaction(TransactionRecord),
}

impl Record {
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        match self {
            Self::Bookmark(_) => RecordKind::Bookmark,
            Self::Purchase(_) => RecordKind::Purchase,
            Self::Review(_) => RecordKind::Review,
            Self::Registration(_) => RecordKind::Registration,
            Self::Transaction(_) => RecordKind::Transaction,
        }
    }

    #[must_use]
    pub fn principal(&self) -> &str {
        match self {
            Self::Bookmark(r) => &r.principal,
            Self::Purchase(r) => &r.principal,
            Self::Review(r) => &r.principal,
            Self::Registration(r) => &r.email,
            Self::Transaction(r) => &r.principal,
        }
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        match self {
            Self::Bookmark(r) => &r.course,
            Self::Purchase(r) => &r.course,
            Self::Review(r) => &r.course,
            Self::Registration(_) => ACCOUNT,
            Self::Transaction(r) => &r.id,
        }
    }

    #[must_use]
    pub fn key(&self) -> LedgerKey {
        LedgerKey::new(self.kind(), self.principal(), self.resource())
    }

    #[must_use]
    pub const fn as_purchase(&self) -> Option<&PurchaseRecord> {
        if let Self::Purchase(r) = self { Some(r) } else { None }
    }

    #[must_use]
    pub const fn as_registration(&self) -> Option<&RegistrationRecord> {
        if let Self::Registration(r) = self { Some(r) } else { None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_is_keyed_by_email_alone() {
        let record = Record::Registration(RegistrationRecord {
            email: "lazy@example.com".to_owned(),
            password_hash: "salt$hash".to_owned(),
            role: Role::Student,
            state: ConfirmationState::Pending,
            created_at: Utc::now(),
            confirmed_at: None,
        });

        assert_eq!(record.key(), LedgerKey::registration("lazy@example.com"));
        assert_eq!(record.key().to_string(), "registration:lazy@example.com:account");
    }

    #[test]
    fn records_serialize_with_kind_tag() {
        let record = Record::Bookmark(BookmarkRecord {
            principal: "user@example.com".to_owned(),
            course: "course-1".to_owned(),
            created_at: Utc::now(),
        });

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "bookmark");
        assert_eq!(json["course"], "course-1");
    }
}
