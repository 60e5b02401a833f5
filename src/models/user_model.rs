use crate::types::models::{
    schedule::DayAvailability,
    user::{
        defaults::{default_roles, default_status},
        mentor_status::MentorStatus,
        role::Role,
        user_status::UserStatus,
    },
};
use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    pub email: String,

    pub password: String,

    #[serde(default = "default_roles")]
    pub roles: HashSet<Role>,

    #[serde(default = "default_status")]
    pub status: UserStatus,

    /// Cached projection of the ledger; only the ledger repository writes it.
    #[serde(default)]
    pub balance: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mentor_profile: Option<MentorProfile>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// The mentor profile, only when an admin has approved it.
    pub fn approved_mentor_profile(&self) -> Option<&MentorProfile> {
        self.mentor_profile
            .as_ref()
            .filter(|profile| profile.status == MentorStatus::Approved)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MentorProfile {
    pub status: MentorStatus,

    #[serde(default)]
    pub headline: String,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub expertise: Vec<String>,

    pub hourly_rate: i64,

    #[serde(default)]
    pub availability: Vec<DayAvailability>,

    #[serde(default = "Utc::now")]
    pub applied_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}

impl MentorProfile {
    pub fn has_expertise(&self, topic: &str) -> bool {
        let topic = topic.trim();
        self.expertise
            .iter()
            .any(|entry| entry.trim().eq_ignore_ascii_case(topic))
    }

    pub fn availability_on(&self, date: NaiveDate) -> Option<&DayAvailability> {
        self.availability.iter().find(|day| day.date == date)
    }
}
