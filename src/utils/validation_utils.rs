use bson::oid::ObjectId;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::json;
use std::{borrow::Cow, collections::HashMap};
use validator::{ValidationError, ValidationErrors};

use crate::{
    errors::AppError,
    types::{
        models::schedule::{DayAvailability, TimeOfDay, TimeSlot},
        requests::{
            auth::{login_request::LoginRequest, register_request::RegisterRequest},
            chat::SendMessageRequest,
            session::{
                book_session_request::BookSessionRequest, feedback_request::FeedbackRequest,
                group_session_request::GroupSessionRequest,
            },
            user::{
                availability_request::AvailabilityRequest,
                mentor_profile_request::MentorProfileRequest,
                update_user_request::UpdateUserRequest,
            },
        },
    },
    utils::{
        locale_utils::Messages,
        schedule_utils::{ScheduleError, ensure_not_past, normalize_slots},
    },
    validations::{
        email::validate_email,
        mentor::{validate_bio, validate_expertise, validate_headline, validate_hourly_rate},
        name::validate_name,
        password::validate_password,
        session::{
            validate_capacity, validate_comment, validate_duration, validate_message_body,
            validate_rating, validate_topic,
        },
    },
};

fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_register_data(
    data: &RegisterRequest,
    messages: &Messages,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_name(&data.name, messages) {
        errors.add("name", e);
    }
    if let Err(e) = validate_email(&data.email, messages) {
        errors.add("email", e);
    }
    if let Err(e) = validate_password(&data.password, messages) {
        errors.add("password", e);
    }

    into_result(errors)
}

/// Login only checks shape; strength rules apply at registration.
pub fn validate_login_data(
    data: &LoginRequest,
    messages: &Messages,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_email(&data.email, messages) {
        errors.add("email", e);
    }
    if data.password.is_empty() {
        errors.add(
            "password",
            add_error(
                "password.empty",
                messages.get_validation_message("password.empty", "Password is required"),
                "",
            ),
        );
    }

    into_result(errors)
}

pub fn validate_profile_update(
    data: &UpdateUserRequest,
    messages: &Messages,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Some(email) = &data.email {
        errors.add(
            "email",
            add_error(
                "email.immutable",
                messages.get_validation_message("email.immutable", "Email cannot be changed"),
                email,
            ),
        );
    }
    match &data.name {
        Some(name) => {
            if let Err(e) = validate_name(name, messages) {
                errors.add("name", e);
            }
        }
        None if data.email.is_none() => errors.add(
            "name",
            add_error(
                "profile.nothing_to_update",
                messages.get_validation_message("profile.nothing_to_update", "Nothing to update"),
                "",
            ),
        ),
        None => {}
    }

    into_result(errors)
}

pub fn validate_mentor_profile_data(
    data: &MentorProfileRequest,
    messages: &Messages,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_headline(&data.headline, messages) {
        errors.add("headline", e);
    }
    if let Err(e) = validate_bio(&data.bio, messages) {
        errors.add("bio", e);
    }
    if let Err(e) = validate_expertise(&data.expertise, messages) {
        errors.add("expertise", e);
    }
    if let Err(e) = validate_hourly_rate(data.hourly_rate, messages) {
        errors.add("hourly_rate", e);
    }

    into_result(errors)
}

fn parse_time(
    field: &'static str,
    raw: &str,
    messages: &Messages,
    errors: &mut ValidationErrors,
) -> Option<TimeOfDay> {
    match raw.parse::<TimeOfDay>() {
        Ok(time) => Some(time),
        Err(_) => {
            errors.add(
                field,
                add_error(
                    "time.invalid",
                    messages.get_validation_message("time.invalid", "Time must use HH:mm format"),
                    raw,
                ),
            );
            None
        }
    }
}

fn check_window(
    start: Option<TimeOfDay>,
    duration: u32,
    messages: &Messages,
    errors: &mut ValidationErrors,
) -> Option<TimeSlot> {
    let window = start.and_then(|start| TimeSlot::starting_at(start, duration));
    if start.is_some() && window.is_none() {
        errors.add(
            "duration",
            add_error(
                "duration.past_midnight",
                messages.get_validation_message(
                    "duration.past_midnight",
                    "Session must end on the same day",
                ),
                &duration.to_string(),
            ),
        );
    }
    window
}

/// The session must start after `now` (UTC).
fn check_start(
    date: NaiveDate,
    start: Option<TimeOfDay>,
    now: NaiveDateTime,
    messages: &Messages,
    errors: &mut ValidationErrors,
) {
    if ensure_not_past(date, now.date()).is_err() {
        errors.add(
            "scheduled_date",
            add_error(
                "date.past",
                messages.get_validation_message("date.past", "Date must not be in the past"),
                &date.to_string(),
            ),
        );
        return;
    }
    if let Some(start) = start.filter(|start| date.and_time(start.as_naive_time()) <= now) {
        errors.add(
            "start_time",
            add_error(
                "start_time.past",
                messages.get_validation_message(
                    "start_time.past",
                    "Start time must be in the future",
                ),
                &start.to_string(),
            ),
        );
    }
}

/// Returns the requested window once every field is valid.
pub fn validate_booking_data(
    data: &BookSessionRequest,
    now: NaiveDateTime,
    messages: &Messages,
) -> Result<TimeSlot, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if data.mentor_id.trim().is_empty() {
        errors.add(
            "mentor_id",
            add_error(
                "mentor_id.empty",
                messages.get_validation_message("mentor_id.empty", "Mentor is required"),
                "",
            ),
        );
    }
    if let Err(e) = validate_topic(&data.topic, messages) {
        errors.add("topic", e);
    }
    let duration_ok = match validate_duration(data.duration, messages) {
        Ok(()) => true,
        Err(e) => {
            errors.add("duration", e);
            false
        }
    };
    let start = parse_time("start_time", &data.start_time, messages, &mut errors);
    check_start(data.scheduled_date, start, now, messages, &mut errors);
    let window = if duration_ok {
        check_window(start, data.duration, messages, &mut errors)
    } else {
        None
    };

    into_result(errors)?;
    window.ok_or_else(ValidationErrors::new)
}

pub fn validate_group_session_data(
    data: &GroupSessionRequest,
    now: NaiveDateTime,
    messages: &Messages,
) -> Result<TimeSlot, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_topic(&data.topic, messages) {
        errors.add("topic", e);
    }
    if let Err(e) = validate_capacity(data.capacity, messages) {
        errors.add("capacity", e);
    }
    let duration_ok = match validate_duration(data.duration, messages) {
        Ok(()) => true,
        Err(e) => {
            errors.add("duration", e);
            false
        }
    };
    let start = parse_time("start_time", &data.start_time, messages, &mut errors);
    check_start(data.scheduled_date, start, now, messages, &mut errors);
    let window = if duration_ok {
        check_window(start, data.duration, messages, &mut errors)
    } else {
        None
    };

    into_result(errors)?;
    window.ok_or_else(ValidationErrors::new)
}

pub fn validate_feedback_data(
    data: &FeedbackRequest,
    messages: &Messages,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_rating(data.rating, messages) {
        errors.add("rating", e);
    }
    if let Err(e) = validate_comment(&data.comment, messages) {
        errors.add("comment", e);
    }

    into_result(errors)
}

pub fn validate_message_data(
    data: &SendMessageRequest,
    messages: &Messages,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = validate_message_body(&data.body, messages) {
        errors.add("body", e);
    }

    into_result(errors)
}

/// Parses and normalizes a day's slots.
pub fn validate_availability_data(
    data: &AvailabilityRequest,
    today: NaiveDate,
    messages: &Messages,
) -> Result<DayAvailability, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if ensure_not_past(data.date, today).is_err() {
        errors.add(
            "date",
            add_error(
                "date.past",
                messages.get_validation_message("date.past", "Date must not be in the past"),
                &data.date.to_string(),
            ),
        );
    }

    let mut slots = Vec::with_capacity(data.slots.len());
    for slot in &data.slots {
        let start = parse_time("slots", &slot.start_time, messages, &mut errors);
        let end = parse_time("slots", &slot.end_time, messages, &mut errors);
        if let (Some(start), Some(end)) = (start, end) {
            slots.push(TimeSlot::new(start, end));
        }
    }
    into_result(errors)?;

    let slots = normalize_slots(slots).map_err(|err| {
        let mut errors = ValidationErrors::new();
        let (code, fallback) = match &err {
            ScheduleError::Inverted(_) => ("slots.inverted", "Slot must end after it starts"),
            ScheduleError::Overlap(..) => ("slots.overlap", "Slots must not overlap"),
            ScheduleError::TooMany(_) => ("slots.too_many", "Too many slots for one day"),
            ScheduleError::PastDate(_) => ("date.past", "Date must not be in the past"),
        };
        errors.add(
            "slots",
            add_error(
                code,
                messages.get_validation_message(code, fallback),
                &err.to_string(),
            ),
        );
        errors
    })?;

    Ok(DayAvailability {
        date: data.date,
        slots,
    })
}

pub fn parse_object_id(raw: &str, messages: &Messages) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| {
        AppError::invalid(messages.get_validation_message("id.invalid", "Invalid identifier"))
    })
}

pub fn add_error(code: &'static str, message: String, field_value: &str) -> ValidationError {
    ValidationError {
        code: code.into(),
        message: Some(Cow::Owned(message)),
        params: {
            let mut params = HashMap::new();
            params.insert("value".into(), json!(field_value));
            params
        },
    }
}
