pub mod admin_service;
pub mod auth_service;
pub mod chat_service;
pub mod ledger_service;
pub mod mentor_service;
pub mod notification_service;
pub mod session_service;
pub mod user_service;
