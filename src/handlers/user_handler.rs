use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use std::sync::Arc;

use crate::{
    errors::AppError,
    extractors::auth_user::AuthUser,
    services::{mentor_service::MentorService, user_service::UserService},
    types::{
        requests::user::{
            availability_request::AvailabilityRequest,
            mentor_profile_request::MentorProfileRequest, update_user_request::UpdateUserRequest,
        },
        responses::api_response::ApiResponse,
    },
    utils::{
        locale_utils::messages_for,
        validation_utils::{
            validate_availability_data, validate_mentor_profile_data, validate_profile_update,
        },
    },
};

pub async fn get_profile_handler(
    req: HttpRequest,
    user: AuthUser,
    user_service: web::Data<Arc<UserService>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let profile = user_service.get_profile(&user.id, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("fetch.success", "User retrieved successfully"),
        profile,
    )))
}

pub async fn update_profile_handler(
    req: HttpRequest,
    user: AuthUser,
    user_service: web::Data<Arc<UserService>>,
    update: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let data = update.into_inner();

    validate_profile_update(&data, &messages).map_err(|errs| {
        AppError::invalid_fields(
            messages.get_user_message("update.invalid_data", "Invalid profile data"),
            errs,
        )
    })?;

    let profile = user_service
        .update_profile(&user.id, &data, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("update.success", "Profile updated successfully"),
        profile,
    )))
}

pub async fn apply_mentor_handler(
    req: HttpRequest,
    user: AuthUser,
    mentor_service: web::Data<Arc<MentorService>>,
    body: web::Json<MentorProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let data = body.into_inner();

    validate_mentor_profile_data(&data, &messages).map_err(|errs| {
        AppError::invalid_fields(
            messages.get_user_message("mentor.invalid_data", "Invalid mentor profile"),
            errs,
        )
    })?;

    let profile = mentor_service.apply(&user.id, &data, &messages).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_user_message("mentor.applied", "Mentor application submitted"),
        profile,
    )))
}

pub async fn update_mentor_profile_handler(
    req: HttpRequest,
    user: AuthUser,
    mentor_service: web::Data<Arc<MentorService>>,
    body: web::Json<MentorProfileRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let data = body.into_inner();

    validate_mentor_profile_data(&data, &messages).map_err(|errs| {
        AppError::invalid_fields(
            messages.get_user_message("mentor.invalid_data", "Invalid mentor profile"),
            errs,
        )
    })?;

    let profile = mentor_service
        .update_profile(&user.id, &data, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("mentor.updated", "Mentor profile updated"),
        profile,
    )))
}

pub async fn set_availability_handler(
    req: HttpRequest,
    user: AuthUser,
    mentor_service: web::Data<Arc<MentorService>>,
    body: web::Json<AvailabilityRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let day = validate_availability_data(&body, Utc::now().date_naive(), &messages).map_err(
        |errs| {
            AppError::invalid_fields(
                messages.get_user_message("availability.invalid_data", "Invalid availability"),
                errs,
            )
        },
    )?;

    let availability = mentor_service
        .set_availability(&user.id, day, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("availability.updated", "Availability updated"),
        availability,
    )))
}
