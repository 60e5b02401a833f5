use actix_web::web;

use crate::{
    app::AppServices,
    handlers::session_handler::{
        add_feedback_handler, book_session_handler, create_group_session_handler,
        get_session_handler, join_session_handler, leave_session_handler, list_sessions_handler,
        update_session_status_handler,
    },
};

pub fn configure_session_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/sessions")
            .app_data(web::Data::new(services.sessions.clone()))
            .route("", web::post().to(book_session_handler))
            .route("", web::get().to(list_sessions_handler))
            .route("/group", web::post().to(create_group_session_handler))
            .route("/{id}", web::get().to(get_session_handler))
            .route("/{id}/status", web::patch().to(update_session_status_handler))
            .route("/{id}/join", web::post().to(join_session_handler))
            .route("/{id}/leave", web::post().to(leave_session_handler))
            .route("/{id}/feedback", web::post().to(add_feedback_handler)),
    );
}
