use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{
    errors::StoreError,
    types::responses::api_response::{ApiResponse, ErrorDetails},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    InvalidData {
        message: String,
        details: Option<ValidationErrors>,
    },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Insufficient balance: available {balance}, required {required}")]
    InsufficientFunds { balance: i64, required: i64 },

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_fields(message: impl Into<String>, errors: ValidationErrors) -> Self {
        Self::InvalidData {
            message: message.into(),
            details: Some(errors),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Maps a repository error while naming the entity for not-found cases.
    pub fn from_store(err: StoreError, entity: &str) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound(format!("{} not found", entity)),
            other => other.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("Record not found".to_string()),
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::InsufficientFunds { balance, required } => {
                Self::InsufficientFunds { balance, required }
            }
            StoreError::Backend { message, .. } => Self::Storage(message),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidData { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientFunds { .. } => StatusCode::PAYMENT_REQUIRED,
            Self::Storage(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let (message, details) = match self {
            Self::InvalidData { message, details } => (
                message.clone(),
                details.as_ref().map(|errors| json!(errors)),
            ),
            Self::InsufficientFunds { balance, required } => (
                self.to_string(),
                Some(json!({ "balance": balance, "required": required })),
            ),
            Self::Storage(_) | Self::Internal(_) => {
                log::error!("Request failed: {}", self);
                ("Internal server error".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        HttpResponse::build(status).json(ApiResponse::<()>::error(
            message,
            Some(ErrorDetails { details }),
        ))
    }
}
