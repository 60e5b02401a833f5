pub mod defaults;
pub mod mentor_status;
pub mod role;
pub mod user_status;
