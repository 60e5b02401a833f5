use serde::Deserialize;

use crate::types::models::session::SessionStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSessionStatusRequest {
    pub status: SessionStatus,

    #[serde(default)]
    pub reason: Option<String>,
}
