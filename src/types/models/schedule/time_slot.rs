use serde::{Deserialize, Serialize};
use std::fmt;

use super::TimeOfDay;

/// Half-open window `[start_time, end_time)` within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

impl TimeSlot {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Window starting at `start_time` lasting `duration` minutes.
    pub fn starting_at(start_time: TimeOfDay, duration: u32) -> Option<Self> {
        start_time
            .checked_add_minutes(duration)
            .map(|end_time| Self::new(start_time, end_time))
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_time < self.end_time
    }

    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end_time.minutes().saturating_sub(self.start_time.minutes()))
    }

    /// Touching windows (`a.end == b.start`) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    pub fn contains(&self, other: &TimeSlot) -> bool {
        self.start_time <= other.start_time && other.end_time <= self.end_time
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start_time, self.end_time)
    }
}
