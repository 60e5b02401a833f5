use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::chat_model::{Chat, ChatMessage};

/// Conversation list entry, as seen by one participant.
#[derive(Debug, Clone, Serialize)]
pub struct ChatSummary {
    pub id: String,
    pub participants: Vec<String>,
    pub last_message: Option<ChatMessage>,
    pub unread: u32,
    pub last_message_at: DateTime<Utc>,
}

impl ChatSummary {
    pub fn for_user(chat: &Chat, user: &ObjectId) -> Self {
        Self {
            id: chat.id.to_hex(),
            participants: chat.participants.iter().map(|id| id.to_hex()).collect(),
            last_message: chat.messages.last().cloned(),
            unread: chat.unread_for(user),
            last_message_at: chat.last_message_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    #[test]
    fn summary_is_seen_from_one_side() {
        let (me, other) = (ObjectId::new(), ObjectId::new());
        let now = Utc::now();
        let chat = Chat {
            id: ObjectId::new(),
            participants: vec![me, other],
            pair_key: Chat::pair_key_for(&me, &other),
            messages: vec![ChatMessage {
                id: ObjectId::new(),
                sender: other,
                body: "Halo".to_string(),
                sent_at: now,
            }],
            unread: HashMap::from([(me.to_hex(), 1)]),
            last_message_at: now,
            created_at: now,
        };

        let mine = ChatSummary::for_user(&chat, &me);
        assert_eq!(mine.participants, vec![me.to_hex(), other.to_hex()]);
        assert_eq!(mine.unread, 1);
        assert_eq!(mine.last_message.map(|message| message.body), Some("Halo".to_string()));
        assert_eq!(ChatSummary::for_user(&chat, &other).unread, 0);
    }
}
