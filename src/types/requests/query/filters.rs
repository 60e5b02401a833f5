use chrono::NaiveDate;
use serde::Deserialize;

use crate::types::models::{
    session::SessionStatus,
    user::{mentor_status::MentorStatus, role::Role, user_status::UserStatus},
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    #[serde(default)]
    pub status: Option<UserStatus>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub mentor_status: Option<MentorStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentorSearchQuery {
    /// Exact (case-insensitive) expertise entry.
    #[serde(default)]
    pub expertise: Option<String>,
    /// Substring matched against name, headline and expertise.
    #[serde(default, rename = "q")]
    pub text: Option<String>,
    #[serde(default)]
    pub max_rate: Option<i64>,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Mentor,
    Mentee,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionFilter {
    #[serde(default, rename = "as")]
    pub role: Option<ParticipantRole>,
    #[serde(default)]
    pub status: Option<SessionStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default)]
    pub page: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}
