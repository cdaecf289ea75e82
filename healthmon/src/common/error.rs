//! エラー型定義
//!
//! 統一エラー型（thiserror使用）
//!
//! `MonitorError`は`external_message()`と`status_code()`を提供し、
//! 内部情報（DBパス、ホスト名等）を外部レスポンスに含めずにエラーを返せます。

use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// 監視エンジンのエラー型
#[derive(Debug, Error)]
pub enum MonitorError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Endpoint not found
    #[error("Endpoint not found: {0}")]
    EndpointNotFound(Uuid),

    /// Service not found
    #[error("Service not found: {0}")]
    ServiceNotFound(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Http(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Inventory file could not be read or parsed
    #[error("Inventory error: {0}")]
    Inventory(String),

    /// Conflict error (e.g., duplicate resource)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MonitorError {
    /// Returns a safe error message for external clients.
    ///
    /// Full details (`to_string()`) belong in server logs only.
    pub fn external_message(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration error",
            Self::Validation(_) => "Invalid request",
            Self::EndpointNotFound(_) => "Endpoint not found",
            Self::ServiceNotFound(_) => "Service not found",
            Self::Database(_) => "Database error",
            Self::Http(_) => "Backend service unavailable",
            Self::Metrics(_) => "Metrics unavailable",
            Self::Inventory(_) => "Invalid inventory",
            Self::Conflict(_) => "Resource conflict",
            Self::Internal(_) => "Internal server error",
        }
    }

    /// Machine readable error code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::EndpointNotFound(_) => "ENDPOINT_NOT_FOUND",
            Self::ServiceNotFound(_) => "SERVICE_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Metrics(_) => "METRICS_ERROR",
            Self::Inventory(_) => "INVENTORY_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::EndpointNotFound(_) => StatusCode::NOT_FOUND,
            Self::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::Metrics(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Inventory(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for MonitorError {
    fn from(err: sqlx::Error) -> Self {
        MonitorError::Database(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for MonitorError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        MonitorError::Database(format!("Failed to run migrations: {}", err))
    }
}

impl From<reqwest::Error> for MonitorError {
    fn from(err: reqwest::Error) -> Self {
        MonitorError::Http(err.to_string())
    }
}

impl From<prometheus::Error> for MonitorError {
    fn from(err: prometheus::Error) -> Self {
        MonitorError::Metrics(err.to_string())
    }
}

/// Result type alias
pub type MonitorResult<T> = Result<T, MonitorError>;
