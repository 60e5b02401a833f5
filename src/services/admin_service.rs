use bson::oid::ObjectId;
use std::sync::Arc;

use crate::{
    errors::AppError,
    repositories::{
        refresh_token_repository::RefreshTokenRepository, user_repository::UserRepository,
    },
    services::notification_service::{NewNotification, NotificationService},
    types::{
        models::{
            notification::{NotificationKind, ReferenceType},
            user::{mentor_status::MentorStatus, user_status::UserStatus},
        },
        requests::query::filters::UserFilter,
        responses::user_response::UserResponse,
    },
    utils::locale_utils::Messages,
};

pub struct AdminService {
    pub user_repository: Arc<dyn UserRepository>,
    pub refresh_token_repository: Arc<dyn RefreshTokenRepository>,
    pub notifications: Arc<NotificationService>,
}

impl AdminService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        refresh_token_repository: Arc<dyn RefreshTokenRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            user_repository,
            refresh_token_repository,
            notifications,
        }
    }

    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserResponse>, AppError> {
        Ok(self
            .user_repository
            .list_users(filter)
            .await?
            .iter()
            .map(UserResponse::from)
            .collect())
    }

    /// Suspending also revokes the user's refresh tokens; access tokens stop
    /// working at the next request because status is checked on every call.
    pub async fn set_user_status(
        &self,
        admin: &ObjectId,
        user_id: &ObjectId,
        status: UserStatus,
        messages: &Messages,
    ) -> Result<UserResponse, AppError> {
        if admin == user_id && status == UserStatus::Suspended {
            return Err(AppError::invalid(messages.get_user_message(
                "admin.self_suspend",
                "Admins cannot suspend themselves",
            )));
        }

        let user = self
            .user_repository
            .set_status(user_id, status)
            .await?
            .ok_or_else(|| {
                AppError::not_found(messages.get_user_message("fetch.not_found", "User not found"))
            })?;

        if status == UserStatus::Suspended {
            let revoked = self
                .refresh_token_repository
                .revoke_all_for_user(user_id)
                .await?;
            log::info!(
                "User {} suspended by {}; {} refresh token(s) revoked",
                user_id,
                admin,
                revoked
            );
        }

        Ok(UserResponse::from(user))
    }

    pub async fn pending_mentors(&self) -> Result<Vec<UserResponse>, AppError> {
        self.list_users(&UserFilter {
            mentor_status: Some(MentorStatus::Pending),
            ..UserFilter::default()
        })
        .await
    }

    pub async fn review_mentor(
        &self,
        user_id: &ObjectId,
        decision: MentorStatus,
        messages: &Messages,
    ) -> Result<UserResponse, AppError> {
        let kind = match decision {
            MentorStatus::Approved => NotificationKind::MentorApproved,
            MentorStatus::Rejected => NotificationKind::MentorRejected,
            MentorStatus::Pending => {
                return Err(AppError::invalid(messages.get_user_message(
                    "mentor.invalid_decision",
                    "A review must approve or reject",
                )));
            }
        };

        let user = self
            .user_repository
            .review_mentor(user_id, MentorStatus::Pending, decision)
            .await?
            .ok_or_else(|| {
                AppError::conflict(messages.get_user_message(
                    "mentor.not_pending",
                    "No pending mentor application for this user",
                ))
            })?;

        self.notifications
            .notify_quietly(
                NewNotification::new(
                    user.id,
                    kind,
                    "Mentor application reviewed",
                    format!("Your mentor application was {}", decision),
                )
                .about(user.id, ReferenceType::User),
            )
            .await;

        Ok(UserResponse::from(user))
    }
}
