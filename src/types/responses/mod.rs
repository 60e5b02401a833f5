pub mod api_response;
pub mod auth_response;
pub mod chat_response;
pub mod user_response;
