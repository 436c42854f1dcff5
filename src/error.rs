//! Common error types for the gallery gateway

use axum::{
    http::{header::RETRY_AFTER, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Please wait {wait_secs} seconds before generating another image")]
    CooldownActive { wait_secs: u64 },

    #[error("Rate limit exceeded. Please try again later.")]
    ProviderRateLimited,

    #[error("Image provider rejected the configured credentials")]
    ProviderAuth,

    #[error("{0}")]
    Provider(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body returned on every handled failure
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::CooldownActive { .. } | AppError::ProviderRateLimited => {
                StatusCode::TOO_MANY_REQUESTS
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the caller. 500-class failures get a generic text so
    /// credentials, connection strings, and stack detail never leave the
    /// process; everything else uses the `Display` form.
    fn public_message(&self) -> String {
        match self {
            AppError::Config(_) | AppError::Io(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
            AppError::Database(_) | AppError::Migrate(_) => "Database error".to_string(),
            AppError::HttpClient(_) => "Failed to reach the image provider".to_string(),
            AppError::ProviderAuth => "Image generation service is misconfigured".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.public_message(),
        });

        let mut response = (status, body).into_response();
        if let AppError::CooldownActive { wait_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&wait_secs.to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
        }
        response
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::InvalidRequest("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolClosed).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Unauthorized("no".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::CooldownActive { wait_secs: 5 }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::ProviderRateLimited.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::ProviderAuth.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Provider("upstream exploded".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_failure_message_is_generic() {
        let message = AppError::ProviderAuth.public_message();
        assert!(!message.to_lowercase().contains("key"));
        assert!(!message.to_lowercase().contains("credential"));
    }

    #[test]
    fn test_database_message_never_leaks_connection_detail() {
        let err = AppError::Database(sqlx::Error::Protocol(
            "connection refused: postgres://gallery:s3cret@db:5432/gallery".to_string(),
        ));
        let message = err.public_message();
        assert_eq!(message, "Database error");
        assert!(!message.contains("s3cret"));
        assert!(!message.contains("postgres://"));
    }

    #[test]
    fn test_provider_message_passes_through() {
        let message = AppError::Provider("model overloaded".into()).public_message();
        assert_eq!(message, "model overloaded");
    }
}
