//! Typed errors and their mapping onto the response envelope.

use crate::query::QueryError;
use crate::response::Envelope;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
    #[error("logging: {0}")]
    Logging(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("validation: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl AppError {
    /// Text sent to the client. Storage and internal failures keep their detail in the logs only.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Db(_) => "database error".to_string(),
            AppError::Config(_) | AppError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Db(e) => tracing::error!(error = %e, "database error"),
            AppError::Config(_) | AppError::Internal(_) => tracing::error!(error = %self, "internal error"),
            AppError::Unauthorized(_) => tracing::warn!(error = %self, "request rejected"),
            _ => tracing::debug!(error = %self, "request failed"),
        }
        Envelope::<()>::error(self.client_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_detail_is_not_exposed() {
        let err = AppError::Db(sqlx::Error::PoolTimedOut);
        assert_eq!(err.client_message(), "database error");
        assert!(err.to_string().starts_with("database: "));
    }

    #[test]
    fn query_errors_pass_through() {
        let err: AppError = QueryError::MalformedPair("nameFoo".into()).into();
        assert_eq!(err.client_message(), "invalid query key/value pair: 'nameFoo'");
    }
}
