use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::{
    errors::AppError,
    services::auth_service::AuthService,
    types::{
        requests::auth::{
            login_request::LoginRequest, refresh_request::RefreshRequest,
            register_request::RegisterRequest,
        },
        responses::api_response::ApiResponse,
    },
    utils::{
        locale_utils::messages_for,
        validation_utils::{validate_login_data, validate_register_data},
    },
};

pub async fn register_user_handler(
    req: HttpRequest,
    auth_service: web::Data<Arc<AuthService>>,
    new_user: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let data = new_user.into_inner();

    validate_register_data(&data, &messages).map_err(|errs| {
        AppError::invalid_fields(
            messages.get_auth_message("register.invalid_data", "Invalid registration data"),
            errs,
        )
    })?;

    let user = auth_service.register(data, &messages).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_auth_message("register.success", "User successfully created."),
        user,
    )))
}

pub async fn jwt_login_handler(
    req: HttpRequest,
    auth_service: web::Data<Arc<AuthService>>,
    credentials: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let data = credentials.into_inner();

    validate_login_data(&data, &messages).map_err(|errs| {
        AppError::invalid_fields(
            messages.get_auth_message("login.invalid_data", "Invalid login data"),
            errs,
        )
    })?;

    let session = auth_service.login(&data, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_auth_message("login.success", "Login successful"),
        session,
    )))
}

pub async fn refresh_token_handler(
    req: HttpRequest,
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let session = auth_service.refresh(&body.refresh_token, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_auth_message("refresh.success", "Token refreshed"),
        session,
    )))
}

pub async fn logout_user_handler(
    req: HttpRequest,
    auth_service: web::Data<Arc<AuthService>>,
    body: web::Json<RefreshRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    auth_service.logout(&body.refresh_token).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_auth_message("logout.success", "Logged out successfully."),
        None::<()>,
    )))
}
