use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    errors::AppError,
    extractors::auth_user::AuthUser,
    services::session_service::SessionService,
    types::{
        requests::{
            query::filters::SessionFilter,
            session::{
                book_session_request::BookSessionRequest, feedback_request::FeedbackRequest,
                group_session_request::GroupSessionRequest,
                update_session_status_request::UpdateSessionStatusRequest,
            },
        },
        responses::api_response::ApiResponse,
    },
    utils::{
        locale_utils::messages_for,
        validation_utils::{
            parse_object_id, validate_booking_data, validate_feedback_data,
            validate_group_session_data,
        },
    },
};

pub async fn book_session_handler(
    req: HttpRequest,
    user: AuthUser,
    session_service: web::Data<Arc<SessionService>>,
    body: web::Json<BookSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let data = body.into_inner();

    let window = validate_booking_data(&data, Utc::now().naive_utc(), &messages).map_err(
        |errs| {
            AppError::invalid_fields(
                messages.get_session_message("book.invalid_data", "Invalid booking request"),
                errs,
            )
        },
    )?;

    let session = session_service
        .book(&user.id, &data, window, &messages)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_session_message("book.success", "Session booked successfully"),
        session,
    )))
}

pub async fn create_group_session_handler(
    req: HttpRequest,
    user: AuthUser,
    session_service: web::Data<Arc<SessionService>>,
    body: web::Json<GroupSessionRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let data = body.into_inner();

    let window = validate_group_session_data(&data, Utc::now().naive_utc(), &messages)
        .map_err(|errs| {
            AppError::invalid_fields(
                messages.get_session_message("group.invalid_data", "Invalid group session"),
                errs,
            )
        })?;

    let session = session_service
        .create_group(&user.id, &data, window, &messages)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_session_message("group.created", "Group session created"),
        session,
    )))
}

pub async fn list_sessions_handler(
    req: HttpRequest,
    user: AuthUser,
    session_service: web::Data<Arc<SessionService>>,
    filter: web::Query<SessionFilter>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let sessions = session_service.list(&user.id, &filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("list.success", "Sessions retrieved"),
        sessions,
    )))
}

pub async fn get_session_handler(
    req: HttpRequest,
    user: AuthUser,
    session_service: web::Data<Arc<SessionService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let session_id = parse_object_id(&path, &messages)?;

    let session = session_service
        .get(&session_id, &user.id, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("fetch.success", "Session retrieved"),
        session,
    )))
}

pub async fn update_session_status_handler(
    req: HttpRequest,
    user: AuthUser,
    session_service: web::Data<Arc<SessionService>>,
    path: web::Path<String>,
    body: web::Json<UpdateSessionStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let session_id = parse_object_id(&path, &messages)?;

    let session = session_service
        .update_status(
            &session_id,
            &user.id,
            body.status,
            body.reason.as_deref(),
            &messages,
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("status.updated", "Session status updated"),
        session,
    )))
}

pub async fn join_session_handler(
    req: HttpRequest,
    user: AuthUser,
    session_service: web::Data<Arc<SessionService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let session_id = parse_object_id(&path, &messages)?;

    let session = session_service
        .join(&session_id, &user.id, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("group.joined", "Joined group session"),
        session,
    )))
}

pub async fn leave_session_handler(
    req: HttpRequest,
    user: AuthUser,
    session_service: web::Data<Arc<SessionService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let session_id = parse_object_id(&path, &messages)?;

    let session = session_service
        .leave(&session_id, &user.id, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_session_message("group.left", "Left group session"),
        session,
    )))
}

pub async fn add_feedback_handler(
    req: HttpRequest,
    user: AuthUser,
    session_service: web::Data<Arc<SessionService>>,
    path: web::Path<String>,
    body: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let session_id = parse_object_id(&path, &messages)?;
    let data = body.into_inner();

    validate_feedback_data(&data, &messages).map_err(|errs| {
        AppError::invalid_fields(
            messages.get_session_message("feedback.invalid_data", "Invalid feedback"),
            errs,
        )
    })?;

    let session = session_service
        .add_feedback(&session_id, &user.id, &data, &messages)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_session_message("feedback.success", "Feedback recorded"),
        session,
    )))
}
