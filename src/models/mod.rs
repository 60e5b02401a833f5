pub mod chat_model;
pub mod notification_model;
pub mod refresh_token_model;
pub mod session_model;
pub mod transaction_model;
pub mod user_model;
