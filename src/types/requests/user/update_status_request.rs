use serde::Deserialize;

use crate::types::models::user::{mentor_status::MentorStatus, user_status::UserStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewMentorRequest {
    pub status: MentorStatus,
}
