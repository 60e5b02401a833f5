use actix_web::web;

use crate::{
    app::AppServices,
    handlers::notification_handler::{
        delete_notification_handler, list_notifications_handler,
        mark_all_notifications_read_handler, mark_notification_read_handler,
        unread_count_handler,
    },
};

pub fn configure_notification_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/notifications")
            .app_data(web::Data::new(services.notifications.clone()))
            .route("", web::get().to(list_notifications_handler))
            .route("/unread-count", web::get().to(unread_count_handler))
            .route("/read-all", web::post().to(mark_all_notifications_read_handler))
            .route("/{id}/read", web::post().to(mark_notification_read_handler))
            .route("/{id}", web::delete().to(delete_notification_handler)),
    );
}
