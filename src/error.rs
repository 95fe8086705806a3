//! Custom error types for gastos
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for gastos operations
#[derive(Error, Debug)]
pub enum GastosError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
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

    /// Monthly budget errors (missing budget, closed month)
    #[error("Budget error: {0}")]
    Budget(String),

    /// The remote backend rejected a request
    #[error("Backend error during {operation} ({status}): {message}")]
    Backend {
        operation: &'static str,
        status: u16,
        message: String,
    },

    /// The request never reached the backend or the response was unreadable
    #[error("HTTP error: {0}")]
    Http(String),

    /// Receipt image errors
    #[error("Receipt error: {0}")]
    Receipt(String),

    /// Local storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl GastosError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for receipts
    pub fn receipt_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Receipt",
            identifier: identifier.into(),
        }
    }

    /// Create a duplicate error for cost centers
    pub fn duplicate_cost_center(identifier: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: "Cost center",
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

    /// Check if this error came from talking to the backend
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend { .. } | Self::Http(_))
    }

    /// Short message suitable for a notification.
    ///
    /// Backend failures are summarized generically; the raw message is
    /// expected to have been logged where the failure happened.
    pub fn user_summary(&self) -> String {
        match self {
            Self::Backend { .. } | Self::Http(_) => {
                "The server could not complete the request".to_string()
            }
            Self::Storage(_) | Self::Io(_) | Self::Json(_) => {
                "Local data could not be read or written".to_string()
            }
            Self::Validation(msg) | Self::Budget(msg) | Self::Receipt(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for GastosError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for GastosError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for GastosError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// Result type alias for gastos operations
pub type GastosResult<T> = Result<T, GastosError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GastosError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = GastosError::expense_not_found("exp-1234abcd");
        assert_eq!(err.to_string(), "Expense not found: exp-1234abcd");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_backend_error_is_summarized() {
        let err = GastosError::Backend {
            operation: "insert expense",
            status: 409,
            message: "duplicate key value violates unique constraint".into(),
        };
        assert!(err.is_backend());
        assert!(err.to_string().contains("duplicate key"));
        assert_eq!(
            err.user_summary(),
            "The server could not complete the request"
        );
    }

    #[test]
    fn test_validation_summary_keeps_message() {
        let err = GastosError::Validation("Description is required".into());
        assert!(err.is_validation());
        assert_eq!(err.user_summary(), "Description is required");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let gastos_err: GastosError = io_err.into();
        assert!(matches!(gastos_err, GastosError::Io(_)));
    }
}
