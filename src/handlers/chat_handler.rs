use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::{
    errors::AppError,
    extractors::auth_user::AuthUser,
    services::chat_service::ChatService,
    types::{
        requests::{
            chat::{OpenChatRequest, SendMessageRequest},
            query::pagination::Pagination,
        },
        responses::api_response::ApiResponse,
    },
    utils::{
        locale_utils::messages_for,
        validation_utils::{parse_object_id, validate_message_data},
    },
};

pub async fn list_chats_handler(
    req: HttpRequest,
    user: AuthUser,
    chat_service: web::Data<Arc<ChatService>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let chats = chat_service.list(&user.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("chat.list_success", "Conversations retrieved"),
        chats,
    )))
}

pub async fn open_chat_handler(
    req: HttpRequest,
    user: AuthUser,
    chat_service: web::Data<Arc<ChatService>>,
    body: web::Json<OpenChatRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let participant = parse_object_id(&body.participant_id, &messages)?;

    let chat = chat_service.open(&user.id, &participant, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("chat.opened", "Conversation ready"),
        chat,
    )))
}

pub async fn list_messages_handler(
    req: HttpRequest,
    user: AuthUser,
    chat_service: web::Data<Arc<ChatService>>,
    path: web::Path<String>,
    pagination: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let chat_id = parse_object_id(&path, &messages)?;

    let page = chat_service
        .messages(&chat_id, &user.id, &pagination, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("chat.messages_success", "Messages retrieved"),
        page,
    )))
}

pub async fn send_message_handler(
    req: HttpRequest,
    user: AuthUser,
    chat_service: web::Data<Arc<ChatService>>,
    path: web::Path<String>,
    body: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let chat_id = parse_object_id(&path, &messages)?;
    let data = body.into_inner();

    validate_message_data(&data, &messages).map_err(|errs| {
        AppError::invalid_fields(
            messages.get_session_message("chat.invalid_message", "Invalid message"),
            errs,
        )
    })?;

    let message = chat_service
        .send(&chat_id, &user.id, &data.body, &messages)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_session_message("chat.sent", "Message sent"),
        message,
    )))
}

pub async fn mark_chat_read_handler(
    req: HttpRequest,
    user: AuthUser,
    chat_service: web::Data<Arc<ChatService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let chat_id = parse_object_id(&path, &messages)?;

    let chat = chat_service.mark_read(&chat_id, &user.id, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("chat.read", "Conversation marked as read"),
        chat,
    )))
}
