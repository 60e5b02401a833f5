pub mod auth_utils;
pub mod locale_utils;
pub mod pricing_utils;
pub mod retry_utils;
pub mod schedule_utils;
pub mod validation_utils;
