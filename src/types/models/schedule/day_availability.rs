use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::TimeSlot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}
