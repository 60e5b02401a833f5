use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::{
    errors::AppError,
    extractors::auth_user::AdminUser,
    services::{admin_service::AdminService, ledger_service::LedgerService},
    types::{
        requests::{
            ledger::{funds_request::AdminAdjustmentRequest, payout_request::SettlePayoutRequest},
            query::filters::UserFilter,
            user::update_status_request::{ReviewMentorRequest, UpdateUserStatusRequest},
        },
        responses::api_response::ApiResponse,
    },
    utils::{locale_utils::messages_for, validation_utils::parse_object_id},
};

pub async fn list_users_handler(
    req: HttpRequest,
    _admin: AdminUser,
    admin_service: web::Data<Arc<AdminService>>,
    filter: web::Query<UserFilter>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let users = admin_service.list_users(&filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("fetch.all_success", "Users retrieved successfully"),
        users,
    )))
}

pub async fn set_user_status_handler(
    req: HttpRequest,
    admin: AdminUser,
    admin_service: web::Data<Arc<AdminService>>,
    path: web::Path<String>,
    body: web::Json<UpdateUserStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let user_id = parse_object_id(&path, &messages)?;

    let user = admin_service
        .set_user_status(&admin.0.id, &user_id, body.status, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("status.updated", "User status updated"),
        user,
    )))
}

pub async fn pending_mentors_handler(
    req: HttpRequest,
    _admin: AdminUser,
    admin_service: web::Data<Arc<AdminService>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let applications = admin_service.pending_mentors().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("mentor.pending_success", "Pending applications retrieved"),
        applications,
    )))
}

pub async fn review_mentor_handler(
    req: HttpRequest,
    _admin: AdminUser,
    admin_service: web::Data<Arc<AdminService>>,
    path: web::Path<String>,
    body: web::Json<ReviewMentorRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let user_id = parse_object_id(&path, &messages)?;

    let user = admin_service
        .review_mentor(&user_id, body.status, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_user_message("mentor.reviewed", "Mentor application reviewed"),
        user,
    )))
}

pub async fn adjust_balance_handler(
    req: HttpRequest,
    _admin: AdminUser,
    ledger_service: web::Data<Arc<LedgerService>>,
    body: web::Json<AdminAdjustmentRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let transaction = ledger_service.admin_adjust(&body, &messages).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_ledger_message("adjust.success", "Balance adjusted"),
        transaction,
    )))
}

pub async fn reconcile_all_handler(
    req: HttpRequest,
    _admin: AdminUser,
    ledger_service: web::Data<Arc<LedgerService>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let drifted = ledger_service.reconcile_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_ledger_message("reconcile.success", "Reconciliation complete"),
        drifted,
    )))
}

pub async fn reconcile_user_handler(
    req: HttpRequest,
    _admin: AdminUser,
    ledger_service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let user_id = parse_object_id(&path, &messages)?;

    let report = ledger_service.reconcile_user(&user_id, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_ledger_message("reconcile.success", "Reconciliation complete"),
        report,
    )))
}

pub async fn pending_payouts_handler(
    req: HttpRequest,
    _admin: AdminUser,
    ledger_service: web::Data<Arc<LedgerService>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let payouts = ledger_service.pending_payouts().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_ledger_message("payout.pending_success", "Pending payouts retrieved"),
        payouts,
    )))
}

pub async fn settle_payout_handler(
    req: HttpRequest,
    _admin: AdminUser,
    ledger_service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
    body: web::Json<SettlePayoutRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let id = parse_object_id(&path, &messages)?;

    let transaction = ledger_service
        .settle_payout(&id, body.status, &messages)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_ledger_message("payout.settled", "Payout settled"),
        transaction,
    )))
}
