use async_trait::async_trait;
use bson::{Document, oid::ObjectId};
use futures_util::stream::TryStreamExt;
use mongodb::{Collection, Database, bson::doc, options::ReturnDocument};

use crate::{
    config::database::get_collection, constants::NOTIFICATION_COL_NAME, errors::StoreError,
    models::notification_model::Notification, types::requests::query::pagination::PageWindow,
};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create_notification(&self, notification: &Notification) -> Result<(), StoreError>;

    /// Newest first, with the total count matching the filter.
    async fn list_for_user(
        &self,
        user: &ObjectId,
        unread_only: bool,
        page: &PageWindow,
    ) -> Result<(Vec<Notification>, u64), StoreError>;

    async fn unread_count(&self, user: &ObjectId) -> Result<u64, StoreError>;

    async fn mark_read(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> Result<Option<Notification>, StoreError>;

    async fn mark_all_read(&self, user: &ObjectId) -> Result<u64, StoreError>;

    async fn delete_notification(&self, id: &ObjectId, user: &ObjectId)
    -> Result<bool, StoreError>;
}

pub struct MongoNotificationRepository {
    collection: Collection<Notification>,
}

impl MongoNotificationRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: get_collection(database, NOTIFICATION_COL_NAME),
        }
    }
}

fn owner_filter(user: &ObjectId, unread_only: bool) -> Document {
    let mut filter = doc! { "user": user };
    if unread_only {
        filter.insert("is_read", false);
    }
    filter
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    async fn create_notification(&self, notification: &Notification) -> Result<(), StoreError> {
        self.collection.insert_one(notification).await?;
        Ok(())
    }

    async fn list_for_user(
        &self,
        user: &ObjectId,
        unread_only: bool,
        page: &PageWindow,
    ) -> Result<(Vec<Notification>, u64), StoreError> {
        let filter = owner_filter(user, unread_only);
        let total = self.collection.count_documents(filter.clone()).await?;

        let limit = i64::try_from(page.limit).unwrap_or(i64::MAX);
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "created_at": -1, "_id": -1 })
            .skip(page.skip())
            .limit(limit)
            .await?;
        Ok((cursor.try_collect().await?, total))
    }

    async fn unread_count(&self, user: &ObjectId) -> Result<u64, StoreError> {
        Ok(self
            .collection
            .count_documents(owner_filter(user, true))
            .await?)
    }

    async fn mark_read(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> Result<Option<Notification>, StoreError> {
        let notification = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "user": user },
                doc! { "$set": { "is_read": true } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(notification)
    }

    async fn mark_all_read(&self, user: &ObjectId) -> Result<u64, StoreError> {
        let result = self
            .collection
            .update_many(owner_filter(user, true), doc! { "$set": { "is_read": true } })
            .await?;
        Ok(result.modified_count)
    }

    async fn delete_notification(
        &self,
        id: &ObjectId,
        user: &ObjectId,
    ) -> Result<bool, StoreError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "user": user })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
