use bson::oid::ObjectId;
use chrono::Utc;
use serde_json::json;
use std::{collections::HashMap, sync::Arc};

use crate::{
    errors::{AppError, StoreError},
    models::chat_model::{Chat, ChatMessage},
    realtime::RealtimeEvent,
    repositories::{chat_repository::ChatRepository, user_repository::UserRepository},
    services::notification_service::{NewNotification, NotificationService},
    types::{
        models::notification::{NotificationKind, ReferenceType},
        requests::query::pagination::Pagination,
        responses::{api_response::Paginated, chat_response::ChatSummary},
    },
    utils::locale_utils::Messages,
};

pub const CHAT_MESSAGE_EVENT: &str = "chat_message";
const PREVIEW_LENGTH: usize = 80;

pub struct ChatService {
    pub chat_repository: Arc<dyn ChatRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub notifications: Arc<NotificationService>,
}

impl ChatService {
    pub fn new(
        chat_repository: Arc<dyn ChatRepository>,
        user_repository: Arc<dyn UserRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            chat_repository,
            user_repository,
            notifications,
        }
    }

    fn chat_not_found(messages: &Messages) -> AppError {
        AppError::not_found(messages.get_user_message("chat.not_found", "Conversation not found"))
    }

    async fn load_chat(
        &self,
        id: &ObjectId,
        user: &ObjectId,
        messages: &Messages,
    ) -> Result<Chat, AppError> {
        self.chat_repository
            .find_by_id(id)
            .await?
            .filter(|chat| chat.is_participant(user))
            .ok_or_else(|| Self::chat_not_found(messages))
    }

    /// Returns the conversation between the two users, creating it on first
    /// contact.
    pub async fn open(
        &self,
        user: &ObjectId,
        participant: &ObjectId,
        messages: &Messages,
    ) -> Result<ChatSummary, AppError> {
        if user == participant {
            return Err(AppError::invalid(
                messages.get_user_message("chat.self", "You cannot message yourself"),
            ));
        }
        self.user_repository
            .find_by_id(participant)
            .await?
            .filter(|other| other.is_active())
            .ok_or_else(|| {
                AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
            })?;

        let pair_key = Chat::pair_key_for(user, participant);
        if let Some(chat) = self.chat_repository.find_by_pair(&pair_key).await? {
            return Ok(ChatSummary::for_user(&chat, user));
        }

        let now = Utc::now();
        let chat = Chat {
            id: ObjectId::new(),
            participants: vec![*user, *participant],
            pair_key: pair_key.clone(),
            messages: Vec::new(),
            unread: HashMap::new(),
            last_message_at: now,
            created_at: now,
        };

        match self.chat_repository.create_chat(&chat).await {
            Ok(()) => Ok(ChatSummary::for_user(&chat, user)),
            // Both sides opened the conversation at once; use the winner.
            Err(StoreError::Conflict(_)) => self
                .chat_repository
                .find_by_pair(&pair_key)
                .await?
                .map(|existing| ChatSummary::for_user(&existing, user))
                .ok_or_else(|| Self::chat_not_found(messages)),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn send(
        &self,
        chat_id: &ObjectId,
        sender: &ObjectId,
        body: &str,
        messages: &Messages,
    ) -> Result<ChatMessage, AppError> {
        let chat = self.load_chat(chat_id, sender, messages).await?;
        let recipients: Vec<ObjectId> = chat
            .participants
            .iter()
            .filter(|participant| *participant != sender)
            .copied()
            .collect();

        let message = ChatMessage {
            id: ObjectId::new(),
            sender: *sender,
            body: body.trim().to_string(),
            sent_at: Utc::now(),
        };
        self.chat_repository
            .push_message(chat_id, &message, &recipients)
            .await?
            .ok_or_else(|| Self::chat_not_found(messages))?;

        let event = RealtimeEvent::new(
            CHAT_MESSAGE_EVENT,
            json!({ "chat_id": chat_id.to_hex(), "message": &message }),
        );
        let preview: String = message.body.chars().take(PREVIEW_LENGTH).collect();
        for recipient in &recipients {
            self.notifications.hub.emit(&recipient.to_hex(), &event);
            self.notifications
                .notify_quietly(
                    NewNotification::new(
                        *recipient,
                        NotificationKind::NewMessage,
                        "New message",
                        preview.clone(),
                    )
                    .about(*chat_id, ReferenceType::Chat),
                )
                .await;
        }

        Ok(message)
    }

    pub async fn list(&self, user: &ObjectId) -> Result<Vec<ChatSummary>, AppError> {
        Ok(self
            .chat_repository
            .list_for_user(user)
            .await?
            .iter()
            .map(|chat| ChatSummary::for_user(chat, user))
            .collect())
    }

    /// Page 1 holds the most recent messages; each page is in sending order.
    pub async fn messages(
        &self,
        chat_id: &ObjectId,
        user: &ObjectId,
        pagination: &Pagination,
        messages: &Messages,
    ) -> Result<Paginated<ChatMessage>, AppError> {
        let chat = self.load_chat(chat_id, user, messages).await?;
        let window = pagination.window();

        let total = chat.messages.len();
        let skip = usize::try_from(window.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(window.limit).unwrap_or(usize::MAX);
        let end = total.saturating_sub(skip);
        let start = end.saturating_sub(limit);

        Ok(Paginated {
            items: chat.messages[start..end].to_vec(),
            total: total as u64,
            page: window.page,
            limit: window.limit,
        })
    }

    pub async fn mark_read(
        &self,
        chat_id: &ObjectId,
        user: &ObjectId,
        messages: &Messages,
    ) -> Result<ChatSummary, AppError> {
        let chat = self
            .chat_repository
            .mark_read(chat_id, user)
            .await?
            .ok_or_else(|| Self::chat_not_found(messages))?;
        Ok(ChatSummary::for_user(&chat, user))
    }
}
