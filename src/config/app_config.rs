use anyhow::{Context, Result, anyhow};
use std::env;

use crate::constants::{
    ACCESS_TOKEN_TTL_MINUTES, DEFAULT_CLIENT_URL, DEFAULT_DB_NAME, DEFAULT_HOST,
    DEFAULT_PAYOUT_THRESHOLD, DEFAULT_PORT, REFRESH_TOKEN_TTL_DAYS,
};

/// Process configuration read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongodb_uri: String,
    pub db_name: String,
    pub jwt_secret: String,
    pub client_url: String,
    pub host: String,
    pub port: u16,
    pub payout_threshold: i64,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
}

fn required_var(name: &str) -> Result<String> {
    let value = env::var(name).with_context(|| format!("{} must be set", name))?;
    if value.trim().is_empty() {
        return Err(anyhow!("{} must not be empty", name));
    }
    Ok(value)
}

fn var_or(name: &str, fallback: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn parsed_var_or<T>(name: &str, fallback: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value '{}'", name, raw)),
        _ => Ok(fallback),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            mongodb_uri: required_var("MONGODB_URI")?,
            db_name: var_or("DB_NAME", DEFAULT_DB_NAME),
            jwt_secret: required_var("JWT_SECRET_KEY")?,
            client_url: var_or("CLIENT_URL", DEFAULT_CLIENT_URL),
            host: var_or("HOST", DEFAULT_HOST),
            port: parsed_var_or("PORT", DEFAULT_PORT)?,
            payout_threshold: parsed_var_or("PAYOUT_THRESHOLD", DEFAULT_PAYOUT_THRESHOLD)?,
            access_token_ttl_minutes: parsed_var_or(
                "ACCESS_TOKEN_TTL_MINUTES",
                ACCESS_TOKEN_TTL_MINUTES,
            )?,
            refresh_token_ttl_days: parsed_var_or("REFRESH_TOKEN_TTL_DAYS", REFRESH_TOKEN_TTL_DAYS)?,
        };

        if config.jwt_secret.len() < 32 {
            return Err(anyhow!("JWT_SECRET_KEY must be at least 32 characters"));
        }
        if config.payout_threshold <= 0 {
            return Err(anyhow!("PAYOUT_THRESHOLD must be positive"));
        }

        Ok(config)
    }

    /// Configuration for tests and local tooling that never touch MongoDB.
    pub fn for_tests() -> Self {
        Self {
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            db_name: DEFAULT_DB_NAME.to_string(),
            jwt_secret: "test-secret-key-that-is-long-enough-for-hs256".to_string(),
            client_url: DEFAULT_CLIENT_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            payout_threshold: DEFAULT_PAYOUT_THRESHOLD,
            access_token_ttl_minutes: ACCESS_TOKEN_TTL_MINUTES,
            refresh_token_ttl_days: REFRESH_TOKEN_TTL_DAYS,
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
