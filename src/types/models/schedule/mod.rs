pub mod day_availability;
pub mod time_of_day;
pub mod time_slot;

pub use day_availability::DayAvailability;
pub use time_of_day::TimeOfDay;
pub use time_slot::TimeSlot;
