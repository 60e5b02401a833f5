pub mod app;
pub mod config;
pub mod constants;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod realtime;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod types;
pub mod utils;
pub mod validations;
