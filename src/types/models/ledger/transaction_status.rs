use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle of a ledger row. The amount is applied to the balance when the
/// row is written regardless of status; `Pending` only marks payouts awaiting
/// settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}
