use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::models::ledger::{TransactionKind, TransactionStatus};

/// Append-only ledger row. `amount` is signed and equals the balance delta it
/// produced; `balance_after` is the balance right after it was applied.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user: ObjectId,

    pub kind: TransactionKind,

    pub amount: i64,

    pub balance_after: i64,

    pub status: TransactionStatus,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ObjectId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credits: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Request to move a user's balance by `amount`.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub user: ObjectId,
    pub kind: TransactionKind,
    pub amount: i64,
    pub status: TransactionStatus,
    pub description: String,
    pub reference: Option<ObjectId>,
    pub credits: Option<i64>,
    pub idempotency_key: Option<String>,
}

impl LedgerEntry {
    pub fn new(
        user: ObjectId,
        kind: TransactionKind,
        amount: i64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user,
            kind,
            amount,
            status: TransactionStatus::Completed,
            description: description.into(),
            reference: None,
            credits: None,
            idempotency_key: None,
        }
    }

    pub fn with_reference(mut self, reference: ObjectId) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn with_credits(mut self, credits: i64) -> Self {
        self.credits = Some(credits);
        self
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn into_transaction(self, balance_after: i64, now: DateTime<Utc>) -> Transaction {
        Transaction {
            id: ObjectId::new(),
            user: self.user,
            kind: self.kind,
            amount: self.amount,
            balance_after,
            status: self.status,
            description: self.description,
            reference: self.reference,
            credits: self.credits,
            idempotency_key: self.idempotency_key,
            created_at: now,
            updated_at: now,
        }
    }
}
