pub mod availability_request;
pub mod mentor_profile_request;
pub mod update_status_request;
pub mod update_user_request;
