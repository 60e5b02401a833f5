use serde::Deserialize;

use crate::types::models::ledger::TransactionStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct PayoutRequest {
    pub amount: i64,

    #[serde(default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettlePayoutRequest {
    pub status: TransactionStatus,
}
