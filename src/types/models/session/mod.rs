pub mod session_kind;
pub mod session_status;

pub use session_kind::SessionKind;
pub use session_status::SessionStatus;
