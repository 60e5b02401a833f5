use bson::oid::ObjectId;
use std::sync::Arc;

use crate::{
    errors::AppError,
    models::user_model::User,
    repositories::user_repository::UserRepository,
    types::{
        requests::user::update_user_request::UpdateUserRequest,
        responses::user_response::UserResponse,
    },
    utils::locale_utils::Messages,
};

pub struct UserService {
    pub user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn find_user(&self, id: &ObjectId, messages: &Messages) -> Result<User, AppError> {
        self.user_repository.find_by_id(id).await?.ok_or_else(|| {
            AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
        })
    }

    pub async fn get_profile(
        &self,
        id: &ObjectId,
        messages: &Messages,
    ) -> Result<UserResponse, AppError> {
        Ok(UserResponse::from(self.find_user(id, messages).await?))
    }

    /// Only the display name is editable.
    pub async fn update_profile(
        &self,
        id: &ObjectId,
        update: &UpdateUserRequest,
        messages: &Messages,
    ) -> Result<UserResponse, AppError> {
        if update.email.is_some() {
            return Err(AppError::invalid(messages.get_user_message(
                "update.email_immutable",
                "Email cannot be changed",
            )));
        }
        let Some(name) = update.name.as_deref() else {
            return self.get_profile(id, messages).await;
        };

        let user = self
            .user_repository
            .update_name(id, name.trim())
            .await?
            .ok_or_else(|| {
                AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
            })?;
        Ok(UserResponse::from(user))
    }
}
