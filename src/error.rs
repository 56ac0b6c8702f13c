//! Typed errors. Request failures surface through `Reply::error`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

/// Request-level failures. Every variant ends up as a 500 with `{"error": <display>}`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database not connected: {0}")]
    NotConnected(String),
    #[error("Storage not configured")]
    StorageNotConfigured,
    #[error("No file data provided")]
    MissingFileData,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("storage: {0}")]
    Storage(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
