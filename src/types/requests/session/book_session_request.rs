use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct BookSessionRequest {
    pub mentor_id: String,

    pub topic: String,

    #[serde(default)]
    pub description: Option<String>,

    pub scheduled_date: NaiveDate,

    pub start_time: String,

    /// Minutes.
    pub duration: u32,
}
