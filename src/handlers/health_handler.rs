use actix_web::{HttpResponse, Responder};
use serde_json::json;

use crate::types::responses::api_response::ApiResponse;

pub async fn health_handler() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(
        "OK",
        json!({ "version": env!("CARGO_PKG_VERSION") }),
    ))
}
