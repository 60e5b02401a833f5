use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;
use std::sync::Arc;

use crate::{
    errors::AppError,
    extractors::auth_user::AuthUser,
    services::{ledger_service::LedgerService, user_service::UserService},
    types::{
        requests::{
            ledger::{
                funds_request::{AddFundsRequest, PurchaseCreditsRequest},
                payout_request::PayoutRequest,
            },
            query::pagination::Pagination,
        },
        responses::api_response::ApiResponse,
    },
    utils::{locale_utils::messages_for, validation_utils::parse_object_id},
};

pub async fn get_balance_handler(
    req: HttpRequest,
    user: AuthUser,
    ledger_service: web::Data<Arc<LedgerService>>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let balance = ledger_service.balance(&user.id, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_ledger_message("balance.success", "Balance retrieved"),
        json!({ "balance": balance }),
    )))
}

pub async fn list_transactions_handler(
    req: HttpRequest,
    user: AuthUser,
    ledger_service: web::Data<Arc<LedgerService>>,
    pagination: web::Query<Pagination>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let page = ledger_service.list(&user.id, &pagination).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_ledger_message("list.success", "Transactions retrieved"),
        page,
    )))
}

pub async fn get_transaction_handler(
    req: HttpRequest,
    user: AuthUser,
    ledger_service: web::Data<Arc<LedgerService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);
    let id = parse_object_id(&path, &messages)?;

    let transaction = ledger_service.get(&id, &user.id, &messages).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        messages.get_ledger_message("fetch.success", "Transaction retrieved"),
        transaction,
    )))
}

pub async fn add_funds_handler(
    req: HttpRequest,
    user: AuthUser,
    ledger_service: web::Data<Arc<LedgerService>>,
    body: web::Json<AddFundsRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let transaction = ledger_service.add_funds(&user.id, &body, &messages).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_ledger_message("add_funds.success", "Funds added"),
        transaction,
    )))
}

pub async fn purchase_credits_handler(
    req: HttpRequest,
    user: AuthUser,
    ledger_service: web::Data<Arc<LedgerService>>,
    body: web::Json<PurchaseCreditsRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let transaction = ledger_service
        .purchase_credits(&user.id, &body, &messages)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_ledger_message("purchase.success", "Credits purchased"),
        transaction,
    )))
}

pub async fn request_payout_handler(
    req: HttpRequest,
    user: AuthUser,
    ledger_service: web::Data<Arc<LedgerService>>,
    user_service: web::Data<Arc<UserService>>,
    body: web::Json<PayoutRequest>,
) -> Result<HttpResponse, AppError> {
    let messages = messages_for(&req);

    let account = user_service.find_user(&user.id, &messages).await?;
    let transaction = ledger_service
        .request_payout(&account, &body, &messages)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        messages.get_ledger_message("payout.requested", "Payout requested"),
        transaction,
    )))
}
