use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::{
    config::app_config::AppConfig,
    errors::{AppError, StoreError},
    extractors::auth_user::AuthUser,
    models::{refresh_token_model::RefreshToken, user_model::User},
    repositories::{
        refresh_token_repository::RefreshTokenRepository, user_repository::UserRepository,
    },
    types::{
        models::user::defaults::{default_roles, default_status},
        requests::auth::{login_request::LoginRequest, register_request::RegisterRequest},
        responses::{
            auth_response::{AuthResponse, TokenPair},
            user_response::UserResponse,
        },
    },
    utils::{
        auth_utils::{JwtKeys, TokenKind, hash_password, verify_password},
        locale_utils::Messages,
        retry_utils::{RetryPolicy, with_retry},
    },
};

pub struct AuthService {
    pub user_repository: Arc<dyn UserRepository>,
    pub refresh_token_repository: Arc<dyn RefreshTokenRepository>,
    keys: JwtKeys,
    access_ttl: Duration,
    refresh_ttl: Duration,
    retry_policy: RetryPolicy,
}

impl AuthService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        refresh_token_repository: Arc<dyn RefreshTokenRepository>,
        config: &AppConfig,
    ) -> Self {
        Self {
            user_repository,
            refresh_token_repository,
            keys: JwtKeys::new(&config.jwt_secret),
            access_ttl: Duration::minutes(config.access_token_ttl_minutes),
            refresh_ttl: Duration::days(config.refresh_token_ttl_days),
            retry_policy: RetryPolicy::default(),
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
        messages: &Messages,
    ) -> Result<UserResponse, AppError> {
        let email = request.email.trim().to_lowercase();
        let duplicate = || {
            AppError::conflict(messages.get_auth_message(
                "register.duplicate",
                "Email is already registered",
            ))
        };

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(duplicate());
        }

        let password = hash_password(&request.password)
            .map_err(|err| AppError::internal(format!("password hashing failed: {}", err)))?;
        let now = Utc::now();
        let user = User {
            id: ObjectId::new(),
            name: request.name.trim().to_string(),
            email,
            password,
            roles: default_roles(),
            status: default_status(),
            balance: 0,
            mentor_profile: None,
            created_at: now,
            updated_at: now,
        };

        // The unique index settles a race between two registrations.
        let created = self
            .user_repository
            .create_user(&user)
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => duplicate(),
                other => other.into(),
            })?;
        log::info!("Registered user {}", created.id);
        Ok(UserResponse::from(created))
    }

    pub async fn login(
        &self,
        request: &LoginRequest,
        messages: &Messages,
    ) -> Result<AuthResponse, AppError> {
        let invalid = || {
            AppError::unauthorized(messages.get_auth_message(
                "login.invalid_credentials",
                "Invalid email or password",
            ))
        };

        let email = request.email.trim().to_lowercase();
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid)?;

        let matches = verify_password(&request.password, &user.password).map_err(|err| {
            AppError::internal(format!("password verification failed: {}", err))
        })?;
        if !matches {
            return Err(invalid());
        }
        if !user.is_active() {
            return Err(AppError::forbidden(
                messages.get_auth_message("login.suspended", "This account is suspended"),
            ));
        }

        let tokens = self.issue_pair(&user).await?;
        log::info!("User {} logged in", user.id);
        Ok(AuthResponse {
            tokens,
            user: UserResponse::from(user),
        })
    }

    /// Rotates a refresh token. Presenting a token that was already rotated
    /// revokes every outstanding refresh token of that user.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        messages: &Messages,
    ) -> Result<AuthResponse, AppError> {
        let invalid = || {
            AppError::unauthorized(messages.get_auth_message(
                "refresh.invalid",
                "Refresh token is invalid or expired",
            ))
        };

        let claims = self
            .keys
            .verify(refresh_token, TokenKind::Refresh)
            .ok_or_else(invalid)?;
        let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| invalid())?;

        if self
            .refresh_token_repository
            .revoke(&claims.jti)
            .await?
            .is_none()
        {
            let revoked = self
                .refresh_token_repository
                .revoke_all_for_user(&user_id)
                .await?;
            log::warn!(
                "Refresh token reuse for user {}; revoked {} token(s)",
                user_id,
                revoked
            );
            return Err(invalid());
        }

        let user = self
            .user_repository
            .find_by_id(&user_id)
            .await?
            .ok_or_else(invalid)?;
        if !user.is_active() {
            return Err(AppError::forbidden(
                messages.get_auth_message("login.suspended", "This account is suspended"),
            ));
        }

        let tokens = self.issue_pair(&user).await?;
        Ok(AuthResponse {
            tokens,
            user: UserResponse::from(user),
        })
    }

    /// Idempotent; an unknown or already revoked token is not an error.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        if let Some(claims) = self.keys.verify(refresh_token, TokenKind::Refresh) {
            self.refresh_token_repository.revoke(&claims.jti).await?;
        }
        Ok(())
    }

    /// Resolves an access token to the current user. Roles and status come
    /// from storage, not from the token.
    pub async fn authenticate(
        &self,
        access_token: &str,
        messages: &Messages,
    ) -> Result<AuthUser, AppError> {
        let unauthorized = || {
            AppError::unauthorized(
                messages.get_auth_message("token.invalid", "Missing or invalid access token"),
            )
        };

        let claims = self
            .keys
            .verify(access_token, TokenKind::Access)
            .ok_or_else(unauthorized)?;
        let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| unauthorized())?;

        let user = with_retry(self.retry_policy, "auth.find_user", || {
            self.user_repository.find_by_id(&user_id)
        })
        .await?
        .ok_or_else(unauthorized)?;

        if !user.is_active() {
            return Err(AppError::forbidden(
                messages.get_auth_message("login.suspended", "This account is suspended"),
            ));
        }

        Ok(AuthUser {
            id: user.id,
            roles: user.roles,
        })
    }

    async fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let user_id = user.id.to_hex();
        let roles: Vec<_> = user.roles.iter().copied().collect();

        let (access_token, _) = self
            .keys
            .issue(&user_id, roles.clone(), TokenKind::Access, self.access_ttl)
            .map_err(|err| AppError::internal(format!("token signing failed: {}", err)))?;
        let (refresh_token, refresh_claims) = self
            .keys
            .issue(&user_id, roles, TokenKind::Refresh, self.refresh_ttl)
            .map_err(|err| AppError::internal(format!("token signing failed: {}", err)))?;

        let now = Utc::now();
        self.refresh_token_repository
            .save_token(&RefreshToken {
                jti: refresh_claims.jti,
                user: user.id,
                revoked: false,
                expires_at: now + self.refresh_ttl,
                created_at: now,
            })
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }
}
