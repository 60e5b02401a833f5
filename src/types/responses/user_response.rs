use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    models::user_model::{MentorProfile, User},
    types::models::user::{role::Role, user_status::UserStatus},
};

/// A user as the owner or an admin sees it. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub status: UserStatus,
    pub balance: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentor_profile: Option<MentorProfile>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let mut roles: Vec<Role> = user.roles.iter().copied().collect();
        roles.sort_by_key(|role| role.to_string());

        Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            email: user.email.clone(),
            roles,
            status: user.status,
            balance: user.balance,
            mentor_profile: user.mentor_profile.clone(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// Public card of an approved mentor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorSummary {
    pub id: String,
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub expertise: Vec<String>,
    pub hourly_rate: i64,
}

impl MentorSummary {
    pub fn from_user(user: &User) -> Option<Self> {
        let profile = user.approved_mentor_profile()?;
        Some(Self {
            id: user.id.to_hex(),
            name: user.name.clone(),
            headline: profile.headline.clone(),
            bio: profile.bio.clone(),
            expertise: profile.expertise.clone(),
            hourly_rate: profile.hourly_rate,
        })
    }
}
