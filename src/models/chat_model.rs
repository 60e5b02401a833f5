use bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: ObjectId,
    pub sender: ObjectId,
    pub body: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Chat {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub participants: Vec<ObjectId>,

    /// Sorted participant ids joined with `:`; unique per pair.
    pub pair_key: String,

    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    /// Unread counters keyed by participant id (hex).
    #[serde(default)]
    pub unread: HashMap<String, u32>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_message_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Chat {
    pub fn pair_key_for(a: &ObjectId, b: &ObjectId) -> String {
        let (first, second) = if a.to_hex() <= b.to_hex() { (a, b) } else { (b, a) };
        format!("{}:{}", first.to_hex(), second.to_hex())
    }

    pub fn is_participant(&self, user: &ObjectId) -> bool {
        self.participants.contains(user)
    }

    pub fn unread_for(&self, user: &ObjectId) -> u32 {
        self.unread.get(&user.to_hex()).copied().unwrap_or(0)
    }
}
