//! Custom error types for the bookkeeper
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for bookkeeper operations
#[derive(Error, Debug)]
pub enum BookkeeperError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input and data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Credential hashing and verification errors
    #[error("Credential error: {0}")]
    Credential(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The user left an interactive flow
    #[error("Aborted: {0}")]
    Aborted(String),
}

impl BookkeeperError {
    /// Create a "not found" error for credentials
    pub fn credential_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Credential",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the user aborted an interactive flow
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

impl From<std::io::Error> for BookkeeperError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BookkeeperError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for bookkeeper operations
pub type BookkeeperResult<T> = Result<T, BookkeeperError>;
