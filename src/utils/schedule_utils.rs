use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    constants::MAX_SLOTS_PER_DAY,
    types::models::schedule::{DayAvailability, TimeSlot},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("slot {0} must end after it starts")]
    Inverted(TimeSlot),

    #[error("slots {0} and {1} overlap")]
    Overlap(TimeSlot, TimeSlot),

    #[error("at most {0} slots are allowed per day")]
    TooMany(usize),

    #[error("{0} is in the past")]
    PastDate(NaiveDate),
}

/// Sorts a day's slots and checks that each is well formed and that no two
/// overlap. Touching slots are allowed.
pub fn normalize_slots(mut slots: Vec<TimeSlot>) -> Result<Vec<TimeSlot>, ScheduleError> {
    if slots.len() > MAX_SLOTS_PER_DAY {
        return Err(ScheduleError::TooMany(MAX_SLOTS_PER_DAY));
    }
    if let Some(inverted) = slots.iter().find(|slot| !slot.is_well_formed()) {
        return Err(ScheduleError::Inverted(*inverted));
    }

    slots.sort();
    if let Some(pair) = slots.windows(2).find(|pair| pair[0].overlaps(&pair[1])) {
        return Err(ScheduleError::Overlap(pair[0], pair[1]));
    }
    Ok(slots)
}

pub fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), ScheduleError> {
    if date < today {
        return Err(ScheduleError::PastDate(date));
    }
    Ok(())
}

/// Whether `window` lies entirely inside a single slot.
pub fn fits_availability(slots: &[TimeSlot], window: &TimeSlot) -> bool {
    slots.iter().any(|slot| slot.contains(window))
}

pub fn first_conflict<'a, I>(booked: I, window: &TimeSlot) -> Option<TimeSlot>
where
    I: IntoIterator<Item = &'a TimeSlot>,
{
    booked.into_iter().find(|slot| slot.overlaps(window)).copied()
}

/// Availability minus booked windows, in order.
pub fn free_windows(slots: &[TimeSlot], booked: &[TimeSlot]) -> Vec<TimeSlot> {
    let mut booked = booked.to_vec();
    booked.sort();

    let mut free = Vec::new();
    for slot in slots {
        let mut cursor = slot.start_time;
        for taken in booked.iter().filter(|taken| taken.overlaps(slot)) {
            if taken.start_time > cursor {
                free.push(TimeSlot::new(cursor, taken.start_time));
            }
            if taken.end_time > cursor {
                cursor = taken.end_time;
            }
        }
        if cursor < slot.end_time {
            free.push(TimeSlot::new(cursor, slot.end_time));
        }
    }
    free
}

/// Replaces the entry for `day.date`; an empty slot list removes the day.
/// Days stay sorted by date.
pub fn upsert_day(availability: &mut Vec<DayAvailability>, day: DayAvailability) {
    availability.retain(|existing| existing.date != day.date);
    if !day.slots.is_empty() {
        availability.push(day);
    }
    availability.sort_by_key(|existing| existing.date);
}

pub fn days_in_range(
    availability: &[DayAvailability],
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<DayAvailability> {
    availability
        .iter()
        .filter(|day| day.date >= from && day.date <= to)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::models::schedule::TimeOfDay;

    fn slot(start: &str, end: &str) -> TimeSlot {
        TimeSlot::new(start.parse::<TimeOfDay>().unwrap(), end.parse().unwrap())
    }

    fn date(raw: &str) -> NaiveDate {
        raw.parse().unwrap()
    }

    #[test]
    fn normalizes_and_sorts_disjoint_slots() {
        let slots = normalize_slots(vec![slot("13:00", "14:00"), slot("09:00", "10:00")]).unwrap();
        assert_eq!(slots, vec![slot("09:00", "10:00"), slot("13:00", "14:00")]);
    }

    #[test]
    fn touching_slots_are_allowed() {
        assert!(normalize_slots(vec![slot("09:00", "10:00"), slot("10:00", "11:00")]).is_ok());
    }

    #[test]
    fn rejects_overlapping_slots() {
        let err = normalize_slots(vec![slot("09:00", "10:30"), slot("10:00", "11:00")])
            .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Overlap(slot("09:00", "10:30"), slot("10:00", "11:00"))
        );
    }

    #[test]
    fn rejects_inverted_and_empty_slots() {
        assert!(matches!(
            normalize_slots(vec![slot("10:00", "09:00")]),
            Err(ScheduleError::Inverted(_))
        ));
        assert!(matches!(
            normalize_slots(vec![slot("10:00", "10:00")]),
            Err(ScheduleError::Inverted(_))
        ));
    }

    #[test]
    fn rejects_too_many_slots() {
        let slots = (0..=MAX_SLOTS_PER_DAY as u16)
            .map(|i| {
                TimeSlot::new(
                    TimeOfDay::from_minutes(i * 20).unwrap(),
                    TimeOfDay::from_minutes(i * 20 + 10).unwrap(),
                )
            })
            .collect();
        assert_eq!(
            normalize_slots(slots),
            Err(ScheduleError::TooMany(MAX_SLOTS_PER_DAY))
        );
    }

    #[test]
    fn window_must_fit_inside_one_slot() {
        let slots = vec![slot("09:00", "10:00"), slot("10:00", "11:00")];
        assert!(fits_availability(&slots, &slot("09:15", "10:00")));
        assert!(!fits_availability(&slots, &slot("09:30", "10:30")));
        assert!(!fits_availability(&slots, &slot("08:30", "09:30")));
    }

    #[test]
    fn detects_conflicts_with_booked_windows() {
        let booked = vec![slot("09:00", "10:00")];
        assert_eq!(
            first_conflict(&booked, &slot("09:30", "10:30")),
            Some(slot("09:00", "10:00"))
        );
        assert_eq!(first_conflict(&booked, &slot("10:00", "10:30")), None);
    }

    #[test]
    fn free_windows_subtract_bookings() {
        let slots = vec![slot("09:00", "12:00"), slot("14:00", "15:00")];
        let booked = vec![slot("10:00", "10:30"), slot("09:00", "09:30"), slot("14:00", "15:00")];
        assert_eq!(
            free_windows(&slots, &booked),
            vec![slot("09:30", "10:00"), slot("10:30", "12:00")]
        );
    }

    #[test]
    fn upsert_replaces_and_clears_days() {
        let mut availability = vec![DayAvailability {
            date: date("2030-01-02"),
            slots: vec![slot("09:00", "10:00")],
        }];

        upsert_day(
            &mut availability,
            DayAvailability {
                date: date("2030-01-01"),
                slots: vec![slot("08:00", "09:00")],
            },
        );
        assert_eq!(availability[0].date, date("2030-01-01"));
        assert_eq!(availability.len(), 2);

        upsert_day(
            &mut availability,
            DayAvailability {
                date: date("2030-01-02"),
                slots: vec![],
            },
        );
        assert_eq!(availability.len(), 1);
        assert_eq!(
            days_in_range(&availability, date("2030-01-01"), date("2030-01-31")).len(),
            1
        );
    }

    #[test]
    fn past_dates_are_rejected() {
        assert!(ensure_not_past(date("2030-01-01"), date("2030-01-02")).is_err());
        assert!(ensure_not_past(date("2030-01-02"), date("2030-01-02")).is_ok());
    }
}
