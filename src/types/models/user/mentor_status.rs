use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Review state of a mentor application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MentorStatus {
    Pending,
    Approved,
    Rejected,
}
