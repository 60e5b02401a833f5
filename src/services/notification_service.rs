use bson::oid::ObjectId;
use chrono::Utc;
use std::sync::Arc;

use crate::{
    errors::AppError,
    models::notification_model::Notification,
    realtime::{RealtimeEvent, RealtimeHub},
    repositories::notification_repository::NotificationRepository,
    types::{
        models::notification::{NotificationKind, ReferenceType},
        requests::query::{filters::NotificationFilter, pagination::Pagination},
        responses::api_response::Paginated,
    },
    utils::locale_utils::Messages,
};

pub const NOTIFICATION_EVENT: &str = "notification";

/// Content of a notification before it is stored.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user: ObjectId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub reference: Option<(ObjectId, ReferenceType)>,
}

impl NewNotification {
    pub fn new(
        user: ObjectId,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            user,
            kind,
            title: title.into(),
            body: body.into(),
            reference: None,
        }
    }

    pub fn about(mut self, id: ObjectId, reference_type: ReferenceType) -> Self {
        self.reference = Some((id, reference_type));
        self
    }
}

pub struct NotificationService {
    pub notification_repository: Arc<dyn NotificationRepository>,
    pub hub: Arc<RealtimeHub>,
}

impl NotificationService {
    pub fn new(
        notification_repository: Arc<dyn NotificationRepository>,
        hub: Arc<RealtimeHub>,
    ) -> Self {
        Self {
            notification_repository,
            hub,
        }
    }

    /// Stores the notification, then pushes it to the recipient's room.
    pub async fn notify(&self, new: NewNotification) -> Result<Notification, AppError> {
        let (reference_id, reference_type) = match new.reference {
            Some((id, kind)) => (Some(id), Some(kind)),
            None => (None, None),
        };
        let notification = Notification {
            id: ObjectId::new(),
            user: new.user,
            kind: new.kind,
            title: new.title,
            body: new.body,
            is_read: false,
            reference_id,
            reference_type,
            created_at: Utc::now(),
        };

        self.notification_repository
            .create_notification(&notification)
            .await?;

        let delivered = self.hub.emit(
            &notification.user.to_hex(),
            &RealtimeEvent::new(NOTIFICATION_EVENT, &notification),
        );
        log::debug!(
            "Notification {} for {} pushed to {} connection(s)",
            notification.kind,
            notification.user,
            delivered
        );

        Ok(notification)
    }

    /// For side effects of an operation that already succeeded: a failure is
    /// logged and swallowed.
    pub async fn notify_quietly(&self, new: NewNotification) {
        let user = new.user;
        let kind = new.kind;
        if let Err(err) = self.notify(new).await {
            log::warn!("Failed to notify {} about {}: {}", user, kind, err);
        }
    }

    pub async fn list(
        &self,
        user: &ObjectId,
        filter: &NotificationFilter,
    ) -> Result<Paginated<Notification>, AppError> {
        let window = Pagination {
            page: filter.page,
            limit: filter.limit,
        }
        .window();
        let (items, total) = self
            .notification_repository
            .list_for_user(user, filter.unread_only, &window)
            .await?;

        Ok(Paginated {
            items,
            total,
            page: window.page,
            limit: window.limit,
        })
    }

    pub async fn unread_count(&self, user: &ObjectId) -> Result<u64, AppError> {
        Ok(self.notification_repository.unread_count(user).await?)
    }

    pub async fn mark_read(
        &self,
        id: &ObjectId,
        user: &ObjectId,
        messages: &Messages,
    ) -> Result<Notification, AppError> {
        self.notification_repository
            .mark_read(id, user)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    messages.get_user_message("notification.not_found", "Notification not found"),
                )
            })
    }

    pub async fn mark_all_read(&self, user: &ObjectId) -> Result<u64, AppError> {
        Ok(self.notification_repository.mark_all_read(user).await?)
    }

    pub async fn delete(
        &self,
        id: &ObjectId,
        user: &ObjectId,
        messages: &Messages,
    ) -> Result<(), AppError> {
        if self
            .notification_repository
            .delete_notification(id, user)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::not_found(messages.get_user_message(
                "notification.not_found",
                "Notification not found",
            )))
        }
    }
}
