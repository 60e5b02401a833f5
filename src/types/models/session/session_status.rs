use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionStatus {
    Pending,
    #[serde(alias = "accepted")]
    #[strum(to_string = "confirmed", serialize = "accepted")]
    Confirmed,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub const ACTIVE: [SessionStatus; 2] = [SessionStatus::Pending, SessionStatus::Confirmed];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn can_transition_to(self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Completed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Cancelled)
        )
    }

    /// Statuses from which `next` may be reached.
    pub fn predecessors(next: SessionStatus) -> Vec<SessionStatus> {
        [Self::Pending, Self::Confirmed, Self::Completed, Self::Cancelled]
            .into_iter()
            .filter(|status| status.can_transition_to(next))
            .collect()
    }
}
