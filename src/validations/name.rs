use validator::ValidationError;

use super::{Rule, check_rules};
use crate::utils::locale_utils::Messages;

const MIN_NAME_LENGTH: usize = 2;
const MAX_NAME_LENGTH: usize = 100;

fn not_blank(name: &str, messages: &Messages) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(messages.get_validation_message("name.empty", "Name must not be empty"));
    }
    Ok(())
}

fn within_length(name: &str, messages: &Messages) -> Result<(), String> {
    let length = name.trim().chars().count();
    if length < MIN_NAME_LENGTH {
        return Err(messages.get_validation_message(
            "name.too_short",
            &format!("Name must be at least {} characters long", MIN_NAME_LENGTH),
        ));
    }
    if length > MAX_NAME_LENGTH {
        return Err(messages.get_validation_message(
            "name.too_long",
            &format!("Name must be at most {} characters", MAX_NAME_LENGTH),
        ));
    }
    Ok(())
}

/// Letters and spaces, plus the hyphen and apostrophe found in real names.
fn allowed_chars(name: &str, messages: &Messages) -> Result<(), String> {
    let valid = name
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'');
    if !valid {
        return Err(messages.get_validation_message(
            "name.invalid_chars",
            "Name can only contain letters, spaces, hyphens and apostrophes",
        ));
    }
    Ok(())
}

pub fn validate_name(name: &str, messages: &Messages) -> Result<(), ValidationError> {
    let rules: [Rule<str>; 3] = [not_blank, within_length, allowed_chars];
    check_rules(name, &rules, "name.invalid", name, messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::locale_utils::Lang;
    use rstest::rstest;

    #[rstest]
    #[case("Siti Nurhaliza", true)]
    #[case("Mary-Jane O'Neil", true)]
    #[case("Zoë", true)]
    #[case(" ", false)]
    #[case("J", false)]
    #[case("R2-D2", false)]
    fn checks_names(#[case] name: &str, #[case] valid: bool) {
        let messages = Messages::new(Lang::En);
        assert_eq!(validate_name(name, &messages).is_ok(), valid);
    }
}
