use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AddFundsRequest {
    pub amount: i64,

    /// Client-generated key so a retried request is applied once.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseCreditsRequest {
    pub credits: i64,

    /// Price of one credit in balance units.
    #[serde(default = "default_unit_price")]
    pub unit_price: i64,

    #[serde(default)]
    pub idempotency_key: Option<String>,
}

fn default_unit_price() -> i64 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminAdjustmentRequest {
    pub user_id: String,

    /// Signed delta.
    pub amount: i64,

    pub reason: String,
}
