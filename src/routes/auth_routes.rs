use actix_web::web;

use crate::{
    app::AppServices,
    handlers::auth_handler::{
        jwt_login_handler, logout_user_handler, refresh_token_handler, register_user_handler,
    },
};

pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/auth")
            .app_data(services.auth_data())
            .route("/register", web::post().to(register_user_handler))
            .route("/login", web::post().to(jwt_login_handler))
            .route("/refresh", web::post().to(refresh_token_handler))
            .route("/logout", web::post().to(logout_user_handler)),
    );
}
