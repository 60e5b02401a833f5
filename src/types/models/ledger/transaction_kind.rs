use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    SessionPayment,
    SessionEarning,
    Refund,
    Payout,
    Credit,
    AddFunds,
}

impl TransactionKind {
    /// Whether a signed amount is legal for this kind. `Credit` is an admin
    /// adjustment and may go either way.
    pub fn accepts_amount(self, amount: i64) -> bool {
        if amount == 0 {
            return false;
        }
        match self {
            Self::SessionPayment | Self::Payout => amount < 0,
            Self::Purchase | Self::SessionEarning | Self::Refund | Self::AddFunds => amount > 0,
            Self::Credit => true,
        }
    }
}
