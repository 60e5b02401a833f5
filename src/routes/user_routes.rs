use actix_web::web;

use crate::{
    app::AppServices,
    handlers::user_handler::{
        apply_mentor_handler, get_profile_handler, set_availability_handler,
        update_mentor_profile_handler, update_profile_handler,
    },
};

pub fn configure_user_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/users")
            .app_data(web::Data::new(services.users.clone()))
            .app_data(web::Data::new(services.mentors.clone()))
            .route("/me", web::get().to(get_profile_handler))
            .route("/me", web::patch().to(update_profile_handler))
            .route("/me/mentor-profile", web::post().to(apply_mentor_handler))
            .route("/me/mentor-profile", web::put().to(update_mentor_profile_handler))
            .route("/me/availability", web::put().to(set_availability_handler)),
    );
}
