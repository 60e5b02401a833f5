use validator::ValidationError;

use super::{Rule, check_rules};
use crate::{
    constants::{
        MAX_GROUP_CAPACITY, MAX_SESSION_MINUTES, MIN_GROUP_CAPACITY, MIN_SESSION_MINUTES,
        SESSION_MINUTE_STEP,
    },
    utils::{locale_utils::Messages, validation_utils::add_error},
};

const MAX_TOPIC_LENGTH: usize = 100;
const MAX_FEEDBACK_LENGTH: usize = 1000;
pub const MAX_MESSAGE_LENGTH: usize = 4000;

fn topic_not_empty(topic: &str, messages: &Messages) -> Result<(), String> {
    if topic.trim().is_empty() {
        return Err(messages.get_validation_message("topic.empty", "Topic must not be empty"));
    }
    Ok(())
}

fn topic_max_length(topic: &str, messages: &Messages) -> Result<(), String> {
    if topic.chars().count() > MAX_TOPIC_LENGTH {
        return Err(messages.get_validation_message(
            "topic.too_long",
            &format!("Topic must be at most {} characters", MAX_TOPIC_LENGTH),
        ));
    }
    Ok(())
}

pub fn validate_topic(topic: &str, messages: &Messages) -> Result<(), ValidationError> {
    let rules: [Rule<str>; 2] = [topic_not_empty, topic_max_length];
    check_rules(topic, &rules, "topic.invalid", topic, messages)
}

fn duration_in_range(duration: &u32, messages: &Messages) -> Result<(), String> {
    if !(MIN_SESSION_MINUTES..=MAX_SESSION_MINUTES).contains(duration) {
        return Err(messages.get_validation_message(
            "duration.out_of_range",
            &format!(
                "Duration must be between {} and {} minutes",
                MIN_SESSION_MINUTES, MAX_SESSION_MINUTES
            ),
        ));
    }
    Ok(())
}

fn duration_on_step(duration: &u32, messages: &Messages) -> Result<(), String> {
    if duration % SESSION_MINUTE_STEP != 0 {
        return Err(messages.get_validation_message(
            "duration.step",
            &format!("Duration must be a multiple of {} minutes", SESSION_MINUTE_STEP),
        ));
    }
    Ok(())
}

pub fn validate_duration(duration: u32, messages: &Messages) -> Result<(), ValidationError> {
    let rules: [Rule<u32>; 2] = [duration_in_range, duration_on_step];
    check_rules(
        &duration,
        &rules,
        "duration.invalid",
        &duration.to_string(),
        messages,
    )
}

pub fn validate_capacity(capacity: u32, messages: &Messages) -> Result<(), ValidationError> {
    if (MIN_GROUP_CAPACITY..=MAX_GROUP_CAPACITY).contains(&capacity) {
        return Ok(());
    }
    Err(add_error(
        "capacity.out_of_range",
        messages.get_validation_message(
            "capacity.out_of_range",
            &format!(
                "Capacity must be between {} and {}",
                MIN_GROUP_CAPACITY, MAX_GROUP_CAPACITY
            ),
        ),
        &capacity.to_string(),
    ))
}

pub fn validate_rating(rating: u8, messages: &Messages) -> Result<(), ValidationError> {
    if (1..=5).contains(&rating) {
        return Ok(());
    }
    Err(add_error(
        "rating.out_of_range",
        messages.get_validation_message("rating.out_of_range", "Rating must be between 1 and 5"),
        &rating.to_string(),
    ))
}

pub fn validate_comment(comment: &str, messages: &Messages) -> Result<(), ValidationError> {
    if comment.chars().count() <= MAX_FEEDBACK_LENGTH {
        return Ok(());
    }
    Err(add_error(
        "comment.too_long",
        messages.get_validation_message(
            "comment.too_long",
            &format!("Comment must be at most {} characters", MAX_FEEDBACK_LENGTH),
        ),
        "",
    ))
}

pub fn validate_message_body(body: &str, messages: &Messages) -> Result<(), ValidationError> {
    if body.trim().is_empty() {
        return Err(add_error(
            "body.empty",
            messages.get_validation_message("body.empty", "Message must not be empty"),
            body,
        ));
    }
    if body.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(add_error(
            "body.too_long",
            messages.get_validation_message(
                "body.too_long",
                &format!("Message must be at most {} characters", MAX_MESSAGE_LENGTH),
            ),
            "",
        ));
    }
    Ok(())
}
