//! Unified error hierarchy for CoachRS
//!
//! Aggregates the per-module error enums into one top-level type with
//! severity classification, retry hints, and user-facing messages for the
//! CLI layer.

use thiserror::Error;

use crate::export::ExportError;
use crate::hydration::HydrationError;
use crate::storage::StorageError;

/// Top-level error type for all CoachRS operations
#[derive(Debug, Error)]
pub enum CoachRsError {
    /// Hydration model errors
    #[error("Hydration error: {0}")]
    Hydration(#[from] HydrationError),

    /// Plan storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for CoachRS operations
pub type Result<T> = std::result::Result<T, CoachRsError>;

impl CoachRsError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoachRsError::Storage(StorageError::Sqlite(_)) | CoachRsError::Io(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoachRsError::Storage(StorageError::NotFound(_)) => ErrorSeverity::Warning,
            CoachRsError::Storage(StorageError::Duplicate(_)) => ErrorSeverity::Warning,
            CoachRsError::Export(ExportError::UnsupportedFormat(_)) => ErrorSeverity::Warning,
            CoachRsError::Storage(_) => ErrorSeverity::Error,
            CoachRsError::Hydration(_) => ErrorSeverity::Error,
            CoachRsError::Internal(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            CoachRsError::Storage(StorageError::NotFound(id)) => {
                format!("No stored plan matches '{}'. Run `coachrs plans` to list saved plans.", id)
            }
            CoachRsError::Storage(StorageError::Duplicate(_)) => {
                "This plan text is already saved. Run `coachrs plans` to see it.".to_string()
            }
            CoachRsError::Export(ExportError::UnsupportedFormat(format)) => {
                format!("Export format '{}' is not supported. Use 'json' or 'csv'.", format)
            }
            CoachRsError::Hydration(HydrationError::EmptyDataset) => {
                "The hydration model has no training data and cannot make recommendations."
                    .to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Critical system error requiring immediate attention
    Critical,
    /// Error that prevents operation but system can continue
    Error,
    /// Warning that doesn't prevent operation
    Warning,
    /// Informational message
    Info,
}

impl ErrorSeverity {
    /// Convert to tracing level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            ErrorSeverity::Critical => tracing::Level::ERROR,
            ErrorSeverity::Error => tracing::Level::ERROR,
            ErrorSeverity::Warning => tracing::Level::WARN,
            ErrorSeverity::Info => tracing::Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_severity() {
        let err = CoachRsError::Storage(StorageError::NotFound("abc123".to_string()));
        assert_eq!(err.severity(), ErrorSeverity::Warning);

        let err = CoachRsError::Internal("test".to_string());
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_error_retryable() {
        let err = CoachRsError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "timeout",
        ));
        assert!(err.is_retryable());

        let err = CoachRsError::Configuration("test".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = CoachRsError::Storage(StorageError::NotFound("abc123".to_string()));
        assert!(err.user_message().contains("abc123"));

        let err = CoachRsError::Export(ExportError::UnsupportedFormat("xml".to_string()));
        assert!(err.user_message().contains("json"));
    }

    #[test]
    fn test_severity_maps_to_tracing_level() {
        assert_eq!(ErrorSeverity::Warning.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(ErrorSeverity::Critical.to_tracing_level(), tracing::Level::ERROR);
    }
}
