pub mod admin_handler;
pub mod auth_handler;
pub mod chat_handler;
pub mod health_handler;
pub mod mentor_handler;
pub mod notification_handler;
pub mod session_handler;
pub mod transaction_handler;
pub mod user_handler;
pub mod ws_handler;
