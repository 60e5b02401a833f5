use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{Error as HashError, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::models::user::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (hex).
    pub sub: String,
    pub roles: Vec<Role>,
    pub kind: TokenKind,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn issue(
        &self,
        user_id: &str,
        roles: Vec<Role>,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            roles,
            kind,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok((token, claims))
    }

    /// Decodes and checks signature, expiry and token kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Option<Claims> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).ok()?;
        (data.claims.kind == expected).then_some(data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String, HashError> {
    let mut salt_bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);
    let salt = SaltString::encode_b64(&salt_bytes)?;

    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(password: &str, hashed: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(hashed)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret-unit-test-secret";

    #[test]
    fn password_hash_round_trip() {
        let hashed = hash_password("Sup3r$ecret").unwrap();
        assert!(hashed.starts_with("$argon2"));
        assert!(verify_password("Sup3r$ecret", &hashed).unwrap());
        assert!(!verify_password("wrong", &hashed).unwrap());
    }

    #[test]
    fn tokens_are_bound_to_their_kind() {
        let keys = JwtKeys::new(SECRET);
        let (token, claims) = keys
            .issue("abc", vec![Role::Mentee], TokenKind::Access, Duration::minutes(5))
            .unwrap();

        let verified = keys.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(verified.sub, "abc");
        assert_eq!(verified.jti, claims.jti);
        assert!(keys.verify(&token, TokenKind::Refresh).is_none());
    }

    #[test]
    fn expired_and_foreign_tokens_are_rejected() {
        let keys = JwtKeys::new(SECRET);
        let (expired, _) = keys
            .issue("abc", vec![], TokenKind::Access, Duration::minutes(-10))
            .unwrap();
        assert!(keys.verify(&expired, TokenKind::Access).is_none());

        let other = JwtKeys::new("another-secret-another-secret-xx");
        let (foreign, _) = other
            .issue("abc", vec![], TokenKind::Access, Duration::minutes(5))
            .unwrap();
        assert!(keys.verify(&foreign, TokenKind::Access).is_none());
    }

    #[test]
    fn parses_bearer_header() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   xyz"), Some("xyz"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
