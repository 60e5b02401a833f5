pub mod admin_routes;
pub mod auth_routes;
pub mod chat_routes;
pub mod mentor_routes;
pub mod notification_routes;
pub mod session_routes;
pub mod transaction_routes;
pub mod user_routes;

use actix_web::{HttpRequest, error, web};

use crate::{
    app::AppServices,
    errors::AppError,
    handlers::{health_handler::health_handler, ws_handler::ws_handler},
};

use self::{
    admin_routes::configure_admin_routes, auth_routes::configure_auth_routes,
    chat_routes::configure_chat_routes, mentor_routes::configure_mentor_routes,
    notification_routes::configure_notification_routes,
    session_routes::configure_session_routes, transaction_routes::configure_transaction_routes,
    user_routes::configure_user_routes,
};

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid(err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid(err.to_string()).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::invalid(err.to_string()).into()
}

/// Mounts the whole API under `/api`. Malformed bodies, queries and paths
/// answer with the same JSON envelope as every other error.
pub fn configure_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/api")
            .app_data(services.auth_data())
            .app_data(web::Data::new(services.hub.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .route("/health", web::get().to(health_handler))
            .route("/ws", web::get().to(ws_handler))
            .configure(|cfg| configure_auth_routes(cfg, services))
            .configure(|cfg| configure_user_routes(cfg, services))
            .configure(|cfg| configure_mentor_routes(cfg, services))
            .configure(|cfg| configure_session_routes(cfg, services))
            .configure(|cfg| configure_transaction_routes(cfg, services))
            .configure(|cfg| configure_chat_routes(cfg, services))
            .configure(|cfg| configure_notification_routes(cfg, services))
            .configure(|cfg| configure_admin_routes(cfg, services)),
    );
}
