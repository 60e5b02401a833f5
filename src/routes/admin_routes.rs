use actix_web::web;

use crate::{
    app::AppServices,
    handlers::admin_handler::{
        adjust_balance_handler, list_users_handler, pending_mentors_handler,
        pending_payouts_handler, reconcile_all_handler, reconcile_user_handler,
        review_mentor_handler, set_user_status_handler, settle_payout_handler,
    },
};

pub fn configure_admin_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/admin")
            .app_data(web::Data::new(services.admin.clone()))
            .app_data(web::Data::new(services.ledger.clone()))
            .route("/users", web::get().to(list_users_handler))
            .route("/users/{id}/status", web::patch().to(set_user_status_handler))
            .route("/mentors/pending", web::get().to(pending_mentors_handler))
            .route("/mentors/{id}/review", web::patch().to(review_mentor_handler))
            .route("/ledger/adjust", web::post().to(adjust_balance_handler))
            .route("/ledger/reconcile", web::get().to(reconcile_all_handler))
            .route("/ledger/reconcile/{user_id}", web::get().to(reconcile_user_handler))
            .route("/payouts/pending", web::get().to(pending_payouts_handler))
            .route("/payouts/{id}", web::patch().to(settle_payout_handler)),
    );
}
