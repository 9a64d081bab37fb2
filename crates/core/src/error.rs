//! Error types for Serpico.
//!
//! A single error enum covers configuration, storage, generation backend,
//! web signal, prompt and serialization failures. Screening rejections are
//! not errors; they are a regular chat outcome.

use thiserror::Error;

/// Unified error type for Serpico.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document store persistence failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generation backend failures (transport, status, decode, empty result)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Web signal disabled or failed
    #[error("Web signal unavailable: {0}")]
    SignalUnavailable(String),

    /// Document store rule violations (e.g. duplicate ids)
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt system errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Whether this error came from the generation backend.
    pub fn is_backend(&self) -> bool {
        matches!(self, AppError::Backend(_))
    }

    /// Whether this error came from document persistence.
    pub fn is_storage(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
