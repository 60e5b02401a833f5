use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NotificationKind {
    SessionBooked,
    SessionConfirmed,
    SessionCancelled,
    SessionCompleted,
    SessionJoined,
    SessionLeft,
    FeedbackReceived,
    NewMessage,
    MentorApproved,
    MentorRejected,
    PayoutUpdated,
}
