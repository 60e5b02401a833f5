use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use std::sync::Arc;

use crate::{
    errors::AppError,
    extractors::auth_user::AuthUser,
    services::notification_service::NotificationService,
    types::{requests::query::filters::NotificationFilter, responses::api_response::ApiResponse},
    utils::{locale_utils::messages_for, validation_utils::parse_object_id},
};

pub async fn list_notifications_handler(
    req: HttpRequest,
    user: AuthUser,
    notification_service: web::Data<Arc<NotificationService>>,
    filter: web::Query<NotificationFilter>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let page = notification_service.list(&user.id, &filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("notification.list_success", "Notifications retrieved"),
        page,
    )))
}

pub async fn unread_count_handler(
    req: HttpRequest,
    user: AuthUser,
    notification_service: web::Data<Arc<NotificationService>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let unread = notification_service.unread_count(&user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("notification.count_success", "Unread count retrieved"),
        json!({ "unread": unread }),
    )))
}

pub async fn mark_notification_read_handler(
    req: HttpRequest,
    user: AuthUser,
    notification_service: web::Data<Arc<NotificationService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let id = parse_object_id(&path, &messages)?;

    let notification = notification_service
        .mark_read(&id, &user.id, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("notification.read", "Notification marked as read"),
        notification,
    )))
}

pub async fn mark_all_notifications_read_handler(
    req: HttpRequest,
    user: AuthUser,
    notification_service: web::Data<Arc<NotificationService>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let updated = notification_service.mark_all_read(&user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("notification.read_all", "All notifications marked as read"),
        json!({ "updated": updated }),
    )))
}

pub async fn delete_notification_handler(
    req: HttpRequest,
    user: AuthUser,
    notification_service: web::Data<Arc<NotificationService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let id = parse_object_id(&path, &messages)?;

    notification_service.delete(&id, &user.id, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("notification.deleted", "Notification deleted"),
        None::<()>,
    )))
}
