use email_address::EmailAddress;
use validator::ValidationError;

use super::{Rule, check_rules};
use crate::utils::locale_utils::Messages;

const MIN_EMAIL_LENGTH: usize = 6;
const MAX_EMAIL_LENGTH: usize = 254;
const MIN_TLD_LENGTH: usize = 2;

fn domain_of(email: &str) -> Option<&str> {
    email.rsplit_once('@').map(|(_, domain)| domain)
}

fn within_length(email: &str, messages: &Messages) -> Result<(), String> {
    match email.len() {
        len if len < MIN_EMAIL_LENGTH => Err(messages.get_validation_message(
            "email.too_short",
            &format!("Email must be at least {} characters", MIN_EMAIL_LENGTH),
        )),
        len if len > MAX_EMAIL_LENGTH => Err(messages.get_validation_message(
            "email.too_long",
            &format!("Email must be at most {} characters", MAX_EMAIL_LENGTH),
        )),
        _ => Ok(()),
    }
}

fn printable_ascii(email: &str, messages: &Messages) -> Result<(), String> {
    if email.chars().any(|c| c.is_whitespace() || !c.is_ascii()) {
        return Err(messages.get_validation_message(
            "email.invalid_chars",
            "Email must not contain spaces or non-ASCII characters",
        ));
    }
    Ok(())
}

fn no_stray_dots(email: &str, messages: &Messages) -> Result<(), String> {
    let local = email.split('@').next().unwrap_or_default();
    if email.contains("..") || local.starts_with('.') || local.ends_with('.') {
        return Err(messages.get_validation_message(
            "email.consecutive_dots",
            "Email must not contain consecutive or leading dots",
        ));
    }
    Ok(())
}

fn has_domain(email: &str, messages: &Messages) -> Result<(), String> {
    let Some(domain) = domain_of(email).filter(|domain| !domain.is_empty()) else {
        return Err(messages.get_validation_message(
            "email.missing_domain",
            "Email must have a domain part after '@'",
        ));
    };

    let labels_ok = domain
        .split('.')
        .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'));
    let tld_ok = domain
        .rsplit_once('.')
        .map(|(_, tld)| tld.len() >= MIN_TLD_LENGTH && tld.chars().all(char::is_alphabetic))
        .unwrap_or(false);

    if labels_ok && tld_ok {
        Ok(())
    } else {
        Err(messages.get_validation_message(
            "email.invalid_domain",
            "The domain part of the email is invalid",
        ))
    }
}

fn well_formed(email: &str, messages: &Messages) -> Result<(), String> {
    if !EmailAddress::is_valid(email) {
        return Err(messages.get_validation_message("email.invalid", "Invalid email format"));
    }
    Ok(())
}

pub fn validate_email(email: &str, messages: &Messages) -> Result<(), ValidationError> {
    let rules: [Rule<str>; 4] = [within_length, printable_ascii, no_stray_dots, has_domain];
    check_rules(email, &rules, "email.invalid", email, messages)?;

    // Full RFC 5322 parse only once the cheaper rules agree.
    check_rules(email, &[well_formed], "email.invalid", email, messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::locale_utils::Lang;
    use rstest::rstest;

    #[rstest]
    #[case("ana@mentorhub.io")]
    #[case("first.last+tag@example.co.id")]
    fn accepts_common_addresses(#[case] email: &str) {
        let messages = Messages::new(Lang::En);
        assert!(validate_email(email, &messages).is_ok());
    }

    #[rstest]
    #[case("a@b.c")]
    #[case("no-at-sign.example.com")]
    #[case("two..dots@example.com")]
    #[case(".lead@example.com")]
    #[case("spaced name@example.com")]
    #[case("user@example")]
    #[case("user@-example.com")]
    #[case("user@example.c0m")]
    fn rejects_malformed_addresses(#[case] email: &str) {
        let messages = Messages::new(Lang::En);
        let error = validate_email(email, &messages).unwrap_err();
        assert_eq!(error.code, "email.invalid");
    }
}
