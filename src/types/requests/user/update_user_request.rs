use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Accepted only so the request can be refused; emails never change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
