use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,

    pub email: String,

    pub password: String,
}
