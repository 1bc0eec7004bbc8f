//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::model::PriceOutOfRange;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration key: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failures reported by the hosted identity provider.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("invalid login credentials")]
    InvalidCredentials,
    #[error("user already registered")]
    AlreadyRegistered,
    #[error("identity provider returned {status}: {message}")]
    Upstream { status: u16, message: String },
    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Failures reported by the hosted object storage.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("upload to {bucket}/{key} failed: {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },
    #[error("remove from {bucket} failed: {message}")]
    Remove { bucket: String, message: String },
    #[error("listing {bucket} failed: {message}")]
    List { bucket: String, message: String },
    #[error("signing {bucket}/{key} failed: {message}")]
    Sign {
        bucket: String,
        key: String,
        message: String,
    },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation: {0}")]
    Validation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<PriceOutOfRange> for AppError {
    fn from(e: PriceOutOfRange) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl AppError {
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AppError::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::Identity(e) => match e {
                IdentityError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "identity_error"),
                IdentityError::AlreadyRegistered => (StatusCode::CONFLICT, "identity_error"),
                IdentityError::Upstream { .. } | IdentityError::Transport(_) => {
                    (StatusCode::BAD_GATEWAY, "identity_error")
                }
            },
            AppError::Storage(_) => (StatusCode::BAD_GATEWAY, "storage_error"),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "request failed");
        } else {
            tracing::warn!(code, error = %self, "request rejected");
        }
        // Database internals stay in the log.
        let message = match &self {
            AppError::Db(sqlx::Error::RowNotFound) => "not found: record".to_string(),
            AppError::Db(_) => "database error".to_string(),
            _ => self.to_string(),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
