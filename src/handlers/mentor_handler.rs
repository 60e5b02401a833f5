use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::{
    errors::AppError,
    extractors::auth_user::AuthUser,
    services::mentor_service::MentorService,
    types::{
        requests::query::filters::{DateQuery, DateRangeQuery, MentorSearchQuery},
        responses::api_response::ApiResponse,
    },
    utils::{locale_utils::messages_for, validation_utils::parse_object_id},
};

pub async fn search_mentors_handler(
    req: HttpRequest,
    _user: AuthUser,
    mentor_service: web::Data<Arc<MentorService>>,
    query: web::Query<MentorSearchQuery>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let mentors = mentor_service.search(&query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("mentor.list_success", "Mentors retrieved"),
        mentors,
    )))
}

pub async fn get_mentor_handler(
    req: HttpRequest,
    _user: AuthUser,
    mentor_service: web::Data<Arc<MentorService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let mentor_id = parse_object_id(&path, &messages)?;

    let mentor = mentor_service.get_mentor(&mentor_id, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("mentor.fetch_success", "Mentor retrieved"),
        mentor,
    )))
}

pub async fn mentor_availability_handler(
    req: HttpRequest,
    _user: AuthUser,
    mentor_service: web::Data<Arc<MentorService>>,
    path: web::Path<String>,
    range: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let mentor_id = parse_object_id(&path, &messages)?;

    let days = mentor_service
        .availability(&mentor_id, range.from, range.to, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("availability.fetch_success", "Availability retrieved"),
        days,
    )))
}

pub async fn free_windows_handler(
    req: HttpRequest,
    _user: AuthUser,
    mentor_service: web::Data<Arc<MentorService>>,
    path: web::Path<String>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let mentor_id = parse_object_id(&path, &messages)?;

    let windows = mentor_service
        .free_windows(&mentor_id, query.date, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("availability.fetch_success", "Availability retrieved"),
        windows,
    )))
}
