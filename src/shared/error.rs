use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No internet connection")]
    Offline,

    #[error("A sync run is already in progress")]
    SyncInProgress,

    #[error("Remote error: {0}")]
    Remote(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AppError {
    /// Errors after which the queued data is still intact and a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Storage(_)
                | AppError::Offline
                | AppError::SyncInProgress
                | AppError::Remote(_)
                | AppError::Timeout(_)
        )
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::StorageUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
