use validator::ValidationError;

use super::{Rule, check_rules};
use crate::utils::locale_utils::Messages;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

fn within_length(password: &str, messages: &Messages) -> Result<(), String> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(messages.get_validation_message(
            "password.too_short",
            &format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH),
        ));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(messages.get_validation_message(
            "password.too_long",
            &format!("Password must be at most {} characters long", MAX_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

fn no_whitespace(password: &str, messages: &Messages) -> Result<(), String> {
    if password.chars().any(char::is_whitespace) {
        return Err(messages.get_validation_message(
            "password.contains_space",
            "Password must not contain spaces",
        ));
    }
    Ok(())
}

fn mixed_case(password: &str, messages: &Messages) -> Result<(), String> {
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(messages.get_validation_message(
            "password.missing_uppercase",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(messages.get_validation_message(
            "password.missing_lowercase",
            "Password must contain at least one lowercase letter",
        ));
    }
    Ok(())
}

fn has_digit(password: &str, messages: &Messages) -> Result<(), String> {
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(messages.get_validation_message(
            "password.missing_digit",
            "Password must contain at least one digit",
        ));
    }
    Ok(())
}

fn has_symbol(password: &str, messages: &Messages) -> Result<(), String> {
    if !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        return Err(messages.get_validation_message(
            "password.missing_special_char",
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}

/// The submitted password is never echoed back in the error params.
pub fn validate_password(password: &str, messages: &Messages) -> Result<(), ValidationError> {
    let rules: [Rule<str>; 5] = [within_length, no_whitespace, mixed_case, has_digit, has_symbol];
    check_rules(password, &rules, "password.invalid", "", messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::locale_utils::Lang;

    #[test]
    fn strong_password_passes() {
        let messages = Messages::new(Lang::En);
        assert!(validate_password("Str0ng!pass", &messages).is_ok());
    }

    #[test]
    fn weak_password_lists_every_failure_without_echoing_it() {
        let messages = Messages::new(Lang::En);
        let error = validate_password("weak", &messages).unwrap_err();

        let message = error.message.unwrap_or_default();
        assert!(message.contains("at least 8"));
        assert!(message.contains("uppercase"));
        assert!(message.contains("digit"));
        assert_eq!(error.params["value"], "");
    }
}
