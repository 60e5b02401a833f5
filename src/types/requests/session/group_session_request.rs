use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSessionRequest {
    pub topic: String,

    #[serde(default)]
    pub description: Option<String>,

    pub scheduled_date: NaiveDate,

    pub start_time: String,

    pub duration: u32,

    pub capacity: u32,
}
