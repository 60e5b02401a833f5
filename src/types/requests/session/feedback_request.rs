use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackRequest {
    pub rating: u8,

    #[serde(default)]
    pub comment: String,
}
