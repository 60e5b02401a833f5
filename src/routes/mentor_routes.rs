use actix_web::web;

use crate::{
    app::AppServices,
    handlers::mentor_handler::{
        free_windows_handler, get_mentor_handler, mentor_availability_handler,
        search_mentors_handler,
    },
};

pub fn configure_mentor_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/mentors")
            .app_data(web::Data::new(services.mentors.clone()))
            .route("", web::get().to(search_mentors_handler))
            .route("/{id}", web::get().to(get_mentor_handler))
            .route("/{id}/availability", web::get().to(mentor_availability_handler))
            .route("/{id}/free-windows", web::get().to(free_windows_handler)),
    );
}
