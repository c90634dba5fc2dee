//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Machine-readable error kind carried in every error body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKindCode {
    NotFound,
    Validation,
    BadRequest,
    ServiceUnavailable,
    Database,
    Config,
}

impl ErrorKindCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKindCode::NotFound => "not_found",
            ErrorKindCode::Validation => "validation_error",
            ErrorKindCode::BadRequest => "bad_request",
            ErrorKindCode::ServiceUnavailable => "service_unavailable",
            ErrorKindCode::Database => "database_error",
            ErrorKindCode::Config => "config_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKindCode::NotFound => StatusCode::NOT_FOUND,
            ErrorKindCode::Validation | ErrorKindCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKindCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKindCode::Database | ErrorKindCode::Config => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKindCode {
        match self {
            AppError::Config(_) => ErrorKindCode::Config,
            AppError::NotFound(_) => ErrorKindCode::NotFound,
            AppError::Validation(_) => ErrorKindCode::Validation,
            AppError::BadRequest(_) => ErrorKindCode::BadRequest,
            AppError::ServiceUnavailable(_) => ErrorKindCode::ServiceUnavailable,
            AppError::Db(e) => match e {
                sqlx::Error::RowNotFound => ErrorKindCode::NotFound,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => ErrorKindCode::ServiceUnavailable,
                sqlx::Error::Database(db) => match db.kind() {
                    ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation => ErrorKindCode::BadRequest,
                    _ => ErrorKindCode::Database,
                },
                _ => ErrorKindCode::Database,
            },
        }
    }

    /// True for store-level integrity failures (unique, foreign key, not null, check).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, AppError::Db(sqlx::Error::Database(_))) && self.kind() == ErrorKindCode::BadRequest
    }

    pub fn not_found(entity: &str, id: i64) -> Self {
        AppError::NotFound(format!("{} {}", entity, id))
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
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match &self {
            AppError::Db(sqlx::Error::Database(db)) if kind == ErrorKindCode::BadRequest => {
                let constraint = db.constraint().unwrap_or("unnamed");
                tracing::warn!(constraint = %constraint, "save rejected by store constraint");
                format!("constraint violation ({}): {}", constraint, db.message())
            }
            AppError::Db(e) if kind == ErrorKindCode::Database => {
                tracing::error!(error = %e, "database error");
                self.to_string()
            }
            _ => self.to_string(),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: kind.as_str().to_string(),
                message,
            },
        };
        (kind.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        assert_eq!(AppError::NotFound("tool 1".into()).kind().status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Validation("size".into()).kind().status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::BadRequest("x".into()).kind().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::ServiceUnavailable("storage".into()).kind().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn sqlx_row_not_found_is_not_found() {
        let err = AppError::Db(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKindCode::NotFound);
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn pool_timeout_is_service_unavailable() {
        assert_eq!(AppError::Db(sqlx::Error::PoolTimedOut).kind(), ErrorKindCode::ServiceUnavailable);
    }

    #[test]
    fn response_carries_code_and_status() {
        let resp = AppError::Validation("page must be at least 1".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
