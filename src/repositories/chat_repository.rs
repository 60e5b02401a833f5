use async_trait::async_trait;
use bson::{Document, oid::ObjectId, to_bson};
use futures_util::stream::TryStreamExt;
use mongodb::{Collection, Database, bson::doc, options::ReturnDocument};

use crate::{
    config::database::get_collection,
    constants::CHAT_COL_NAME,
    errors::StoreError,
    models::chat_model::{Chat, ChatMessage},
};

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Fails with `StoreError::Conflict` when the pair already has a chat.
    async fn create_chat(&self, chat: &Chat) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Chat>, StoreError>;

    async fn find_by_pair(&self, pair_key: &str) -> Result<Option<Chat>, StoreError>;

    /// Most recently active first.
    async fn list_for_user(&self, user: &ObjectId) -> Result<Vec<Chat>, StoreError>;

    /// Appends `message` and bumps the unread counter of every recipient.
    async fn push_message(
        &self,
        id: &ObjectId,
        message: &ChatMessage,
        recipients: &[ObjectId],
    ) -> Result<Option<Chat>, StoreError>;

    async fn mark_read(&self, id: &ObjectId, user: &ObjectId)
    -> Result<Option<Chat>, StoreError>;
}

pub struct MongoChatRepository {
    collection: Collection<Chat>,
}

impl MongoChatRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: get_collection(database, CHAT_COL_NAME),
        }
    }
}

#[async_trait]
impl ChatRepository for MongoChatRepository {
    async fn create_chat(&self, chat: &Chat) -> Result<(), StoreError> {
        self.collection.insert_one(chat).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Chat>, StoreError> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_pair(&self, pair_key: &str) -> Result<Option<Chat>, StoreError> {
        Ok(self.collection.find_one(doc! { "pair_key": pair_key }).await?)
    }

    async fn list_for_user(&self, user: &ObjectId) -> Result<Vec<Chat>, StoreError> {
        let cursor = self
            .collection
            .find(doc! { "participants": user })
            .sort(doc! { "last_message_at": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn push_message(
        &self,
        id: &ObjectId,
        message: &ChatMessage,
        recipients: &[ObjectId],
    ) -> Result<Option<Chat>, StoreError> {
        let mut increments = Document::new();
        for recipient in recipients {
            increments.insert(format!("unread.{}", recipient.to_hex()), 1_i32);
        }

        let mut update = doc! {
            "$push": { "messages": to_bson(message)? },
            "$set": { "last_message_at": bson::DateTime::from_chrono(message.sent_at) },
        };
        if !increments.is_empty() {
            update.insert("$inc", increments);
        }

        let chat = self
            .collection
            .find_one_and_update(doc! { "_id": id, "participants": message.sender }, update)
            .return_document(ReturnDocument::After)
            .await?;
        Ok(chat)
    }

    async fn mark_read(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> Result<Option<Chat>, StoreError> {
        let mut reset = Document::new();
        reset.insert(format!("unread.{}", user.to_hex()), 0_i32);

        let chat = self
            .collection
            .find_one_and_update(doc! { "_id": id, "participants": user }, doc! { "$set": reset })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(chat)
    }
}
