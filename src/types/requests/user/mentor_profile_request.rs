use serde::Deserialize;

/// Body of both the mentor application and later profile edits.
#[derive(Debug, Clone, Deserialize)]
pub struct MentorProfileRequest {
    #[serde(default)]
    pub headline: String,

    #[serde(default)]
    pub bio: String,

    pub expertise: Vec<String>,

    pub hourly_rate: i64,
}
