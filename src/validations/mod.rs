pub mod email;
pub mod mentor;
pub mod name;
pub mod password;
pub mod session;

use rayon::prelude::*;
use validator::ValidationError;

use crate::utils::{locale_utils::Messages, validation_utils::add_error};

/// A single check returning the localized failure message.
pub type Rule<T> = fn(&T, &Messages) -> Result<(), String>;

/// Evaluates every rule in parallel and folds the failures into one
/// `ValidationError` under `code`. `shown` is echoed back as the `value` param.
pub fn check_rules<T>(
    value: &T,
    rules: &[Rule<T>],
    code: &'static str,
    shown: &str,
    messages: &Messages,
) -> Result<(), ValidationError>
where
    T: ?Sized + Sync,
{
    let errors: Vec<String> = rules
        .par_iter()
        .filter_map(|rule| rule(value, messages).err())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(add_error(code, errors.join(", "), shown))
    }
}
