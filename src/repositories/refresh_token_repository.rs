use async_trait::async_trait;
use bson::oid::ObjectId;
use mongodb::{Collection, Database, bson::doc, options::ReturnDocument};

use crate::{
    config::database::get_collection, constants::REFRESH_TOKEN_COL_NAME, errors::StoreError,
    models::refresh_token_model::RefreshToken,
};

#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    async fn save_token(&self, token: &RefreshToken) -> Result<(), StoreError>;

    /// Revokes a live token and returns it; `None` when unknown or already
    /// revoked, so a replayed token can never be rotated twice.
    async fn revoke(&self, jti: &str) -> Result<Option<RefreshToken>, StoreError>;

    async fn revoke_all_for_user(&self, user: &ObjectId) -> Result<u64, StoreError>;
}

pub struct MongoRefreshTokenRepository {
    collection: Collection<RefreshToken>,
}

impl MongoRefreshTokenRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: get_collection(database, REFRESH_TOKEN_COL_NAME),
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MongoRefreshTokenRepository {
    async fn save_token(&self, token: &RefreshToken) -> Result<(), StoreError> {
        self.collection.insert_one(token).await?;
        Ok(())
    }

    async fn revoke(&self, jti: &str) -> Result<Option<RefreshToken>, StoreError> {
        let token = self
            .collection
            .find_one_and_update(
                doc! { "_id": jti, "revoked": false },
                doc! { "$set": { "revoked": true } },
            )
            .return_document(ReturnDocument::Before)
            .await?;
        Ok(token)
    }

    async fn revoke_all_for_user(&self, user: &ObjectId) -> Result<u64, StoreError> {
        let result = self
            .collection
            .update_many(
                doc! { "user": user, "revoked": false },
                doc! { "$set": { "revoked": true } },
            )
            .await?;
        Ok(result.modified_count)
    }
}
