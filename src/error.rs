//! Custom error types for the fin-tracker data layer
//!
//! This module defines the error hierarchy for the crate using thiserror
//! for ergonomic error definitions.
//!
//! Write-path failures (validation, storage writes) are fatal and surface
//! through these variants. Read-path failures (checksum mismatch, unreadable
//! legacy keys) are recovered inside the migration engine and never reach
//! callers as errors.

use thiserror::Error;

/// The main error type for fin-tracker operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Structural validation failed on save or import; nothing was persisted
    #[error("Validation error: {0}")]
    Validation(String),

    /// The storage substrate rejected a write (quota, permissions, I/O)
    #[error("Storage error: {0}")]
    Storage(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Import blob was not a recognizable portable export
    #[error("Import error: {0}")]
    Import(String),
}

impl TrackerError {
    /// Build a validation error from a list of issue messages
    pub fn from_issues(issues: &[crate::validate::ValidationIssue]) -> Self {
        let joined = issues
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::Validation(joined)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a storage-write error
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for fin-tracker operations
pub type TrackerResult<T> = Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TrackerError::Validation("accounts[0].id: missing".into());
        assert_eq!(err.to_string(), "Validation error: accounts[0].id: missing");
        assert!(err.is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: TrackerError = io_err.into();
        assert!(matches!(err, TrackerError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: TrackerError = json_err.into();
        assert!(matches!(err, TrackerError::Json(_)));
    }
}
