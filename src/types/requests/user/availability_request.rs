use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SlotRequest {
    pub start_time: String,
    pub end_time: String,
}

/// Replaces every slot of `date`. An empty list clears the day.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<SlotRequest>,
}
