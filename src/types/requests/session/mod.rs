pub mod book_session_request;
pub mod feedback_request;
pub mod group_session_request;
pub mod update_session_status_request;
