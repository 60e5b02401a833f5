use actix_cors::Cors;
use actix_web::http::{Method, header};

pub fn configure_cors(client_url: &str) -> Cors {
    Cors::default()
        .allowed_origin(client_url)
        .allowed_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
