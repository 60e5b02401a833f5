use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct OpenChatRequest {
    pub participant_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
}
