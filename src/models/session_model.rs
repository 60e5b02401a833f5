use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::models::{
    schedule::{TimeOfDay, TimeSlot},
    session::{SessionKind, SessionStatus},
};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionFeedback {
    pub mentee: ObjectId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub mentor: ObjectId,

    #[serde(default)]
    pub mentees: Vec<ObjectId>,

    /// Mentees who left a group session; they cannot take a seat again.
    #[serde(default)]
    pub departed: Vec<ObjectId>,

    pub kind: SessionKind,

    pub capacity: u32,

    pub topic: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub scheduled_date: NaiveDate,

    pub start_time: TimeOfDay,

    /// Minutes.
    pub duration: u32,

    pub status: SessionStatus,

    /// Charged to each mentee, fixed at creation.
    pub price: i64,

    #[serde(default)]
    pub feedback: Vec<SessionFeedback>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub starts_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn window(&self) -> Option<TimeSlot> {
        TimeSlot::starting_at(self.start_time, self.duration)
    }

    pub fn is_mentor(&self, user: &ObjectId) -> bool {
        self.mentor == *user
    }

    pub fn is_mentee(&self, user: &ObjectId) -> bool {
        self.mentees.contains(user)
    }

    pub fn has_departed(&self, user: &ObjectId) -> bool {
        self.departed.contains(user)
    }

    pub fn involves(&self, user: &ObjectId) -> bool {
        self.is_mentor(user) || self.is_mentee(user)
    }

    pub fn has_feedback_from(&self, mentee: &ObjectId) -> bool {
        self.feedback.iter().any(|entry| entry.mentee == *mentee)
    }

    pub fn has_free_seat(&self) -> bool {
        (self.mentees.len() as u64) < u64::from(self.capacity)
    }
}
