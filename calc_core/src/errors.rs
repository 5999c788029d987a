//! # Error Types
//!
//! Structured error types for calc_core. Estimators themselves never fail on
//! user input (bad numbers degrade to zero), so these errors only surface at
//! the edges: rejecting an unknown category key, loading settings, or
//! decoding a JSON estimate request.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_count(count: usize) -> CalcResult<()> {
//!     if count == 0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "count".to_string(),
//!             value: count.to_string(),
//!             reason: "Count must be at least 1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimator operations.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic error handling by API consumers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong shape, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A categorical key is not present in the coefficient table
    #[error("Unknown {table} key: '{key}'")]
    UnknownCategory { table: String, key: String },

    /// No estimator is registered under this identifier
    #[error("Unknown tool: '{tool}'")]
    UnknownTool { tool: String },

    /// Settings file could not be read or parsed
    #[error("Configuration error: {source_name} - {reason}")]
    Config { source_name: String, reason: String },

    /// JSON/TOML serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownCategory error
    pub fn unknown_category(table: impl Into<String>, key: impl Into<String>) -> Self {
        CalcError::UnknownCategory {
            table: table.into(),
            key: key.into(),
        }
    }

    /// Create an UnknownTool error
    pub fn unknown_tool(tool: impl Into<String>) -> Self {
        CalcError::UnknownTool { tool: tool.into() }
    }

    /// Create a Config error
    pub fn config(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Config {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CalcError::Internal {
            message: message.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::UnknownCategory { .. } => "UNKNOWN_CATEGORY",
            CalcError::UnknownTool { .. } => "UNKNOWN_TOOL",
            CalcError::Config { .. } => "CONFIG_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::unknown_category("rock type", "granite-boulders");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"UnknownCategory\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::unknown_tool("paint").error_code(), "UNKNOWN_TOOL");
        assert_eq!(CalcError::config("yardstick.toml", "bad").error_code(), "CONFIG_ERROR");
        assert_eq!(
            CalcError::invalid_input("count", "0", "must be positive").error_code(),
            "INVALID_INPUT"
        );
        let internal = CalcError::internal("embedded word bank: bad");
        assert_eq!(internal.error_code(), "INTERNAL_ERROR");
        assert_eq!(internal.to_string(), "Internal error: embedded word bank: bad");
    }

    #[test]
    fn test_error_display() {
        let error = CalcError::unknown_category("gravel type", "moon-dust");
        assert_eq!(error.to_string(), "Unknown gravel type key: 'moon-dust'");
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let calc: CalcError = err.into();
        assert_eq!(calc.error_code(), "SERIALIZATION_ERROR");
    }
}
