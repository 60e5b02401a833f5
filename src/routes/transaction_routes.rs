use actix_web::web;

use crate::{
    app::AppServices,
    handlers::transaction_handler::{
        add_funds_handler, get_balance_handler, get_transaction_handler,
        list_transactions_handler, purchase_credits_handler, request_payout_handler,
    },
};

pub fn configure_transaction_routes(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.service(
        web::scope("/transactions")
            .app_data(web::Data::new(services.ledger.clone()))
            .app_data(web::Data::new(services.users.clone()))
            .route("", web::get().to(list_transactions_handler))
            .route("/balance", web::get().to(get_balance_handler))
            .route("/add-funds", web::post().to(add_funds_handler))
            .route("/purchase", web::post().to(purchase_credits_handler))
            .route("/payout", web::post().to(request_payout_handler))
            .route("/{id}", web::get().to(get_transaction_handler)),
    );
}
