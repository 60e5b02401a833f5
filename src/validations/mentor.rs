use validator::ValidationError;

use super::{Rule, check_rules};
use crate::{
    constants::{MAX_EXPERTISE_ENTRIES, MAX_HOURLY_RATE, MIN_HOURLY_RATE},
    utils::{locale_utils::Messages, validation_utils::add_error},
};

const MAX_HEADLINE_LENGTH: usize = 120;
const MAX_BIO_LENGTH: usize = 2000;
const MAX_EXPERTISE_LENGTH: usize = 50;

fn has_entries(expertise: &[String], messages: &Messages) -> Result<(), String> {
    if expertise.iter().all(|entry| entry.trim().is_empty()) {
        return Err(messages.get_validation_message(
            "expertise.empty",
            "At least one expertise entry is required",
        ));
    }
    Ok(())
}

fn has_max_entries(expertise: &[String], messages: &Messages) -> Result<(), String> {
    if expertise.len() > MAX_EXPERTISE_ENTRIES {
        return Err(messages.get_validation_message(
            "expertise.too_many",
            &format!("No more than {} expertise entries", MAX_EXPERTISE_ENTRIES),
        ));
    }
    Ok(())
}

fn has_short_entries(expertise: &[String], messages: &Messages) -> Result<(), String> {
    if expertise
        .iter()
        .any(|entry| entry.trim().chars().count() > MAX_EXPERTISE_LENGTH)
    {
        return Err(messages.get_validation_message(
            "expertise.too_long",
            &format!(
                "Expertise entries must be at most {} characters",
                MAX_EXPERTISE_LENGTH
            ),
        ));
    }
    Ok(())
}

pub fn validate_expertise(expertise: &[String], messages: &Messages) -> Result<(), ValidationError> {
    let rules: [Rule<[String]>; 3] = [has_entries, has_max_entries, has_short_entries];
    check_rules(
        expertise,
        &rules,
        "expertise.invalid",
        &expertise.join(","),
        messages,
    )
}

pub fn validate_hourly_rate(rate: i64, messages: &Messages) -> Result<(), ValidationError> {
    if (MIN_HOURLY_RATE..=MAX_HOURLY_RATE).contains(&rate) {
        return Ok(());
    }
    Err(add_error(
        "hourly_rate.out_of_range",
        messages.get_validation_message(
            "hourly_rate.out_of_range",
            &format!(
                "Hourly rate must be between {} and {}",
                MIN_HOURLY_RATE, MAX_HOURLY_RATE
            ),
        ),
        &rate.to_string(),
    ))
}

pub fn validate_headline(headline: &str, messages: &Messages) -> Result<(), ValidationError> {
    if headline.chars().count() <= MAX_HEADLINE_LENGTH {
        return Ok(());
    }
    Err(add_error(
        "headline.too_long",
        messages.get_validation_message(
            "headline.too_long",
            &format!("Headline must be at most {} characters", MAX_HEADLINE_LENGTH),
        ),
        headline,
    ))
}

pub fn validate_bio(bio: &str, messages: &Messages) -> Result<(), ValidationError> {
    if bio.chars().count() <= MAX_BIO_LENGTH {
        return Ok(());
    }
    Err(add_error(
        "bio.too_long",
        messages.get_validation_message(
            "bio.too_long",
            &format!("Bio must be at most {} characters", MAX_BIO_LENGTH),
        ),
        "",
    ))
}
