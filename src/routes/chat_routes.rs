use actix_web::web;

use crate::{
    app::AppServices,
    handlers::chat_handler::{
        list_chats_handler, list_messages_handler, mark_chat_read_handler, open_chat_handler,
        send_message_handler,
    },
};

pub fn configure_chat_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/chat")
            .app_data(web::Data::new(services.chats.clone()))
            .route("", web::get().to(list_chats_handler))
            .route("", web::post().to(open_chat_handler))
            .route("/{id}/messages", web::get().to(list_messages_handler))
            .route("/{id}/messages", web::post().to(send_message_handler))
            .route("/{id}/read", web::post().to(mark_chat_read_handler)),
    );
}
