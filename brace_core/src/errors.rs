//! # Error Types
//!
//! Structured error types for brace_core.
//!
//! The calculation stages themselves never fail: unknown reference data
//! resolves to a documented fallback and degenerate geometry short-circuits
//! to zero. Errors only come from the document layer, when a mutator is
//! pointed at an entity that does not exist or is given a value that cannot
//! be stored, and from file I/O.
//!
//! ## Example
//!
//! ```rust
//! use brace_core::errors::{CalcError, CalcResult};
//!
//! fn validate_storey_height(height_m: f64) -> CalcResult<()> {
//!     if !(height_m > 0.0) {
//!         return Err(CalcError::invalid_input(
//!             "storey_height_m",
//!             height_m.to_string(),
//!             "Storey height must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for brace_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for document operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, not finite, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A referenced entity (level, part, assembly, section...) does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
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

    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CalcError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::NotFound { .. } => "NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

/// Reject NaN/infinite values and values below `min`.
///
/// Shared by the document mutators so every numeric field is checked the
/// same way.
pub fn ensure_at_least(field: &str, value: f64, min: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value must be a finite number"));
    }
    if value < min {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("Value must be at least {min}"),
        ));
    }
    Ok(value)
}

/// Reject values outside `[min, max]` (inclusive).
pub fn ensure_in_range(field: &str, value: f64, min: f64, max: f64) -> CalcResult<f64> {
    ensure_at_least(field, value, min)?;
    if value > max {
        return Err(CalcError::invalid_input(
            field,
            value.to_string(),
            format!("Value must be between {min} and {max}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("storey_height_m", "-2.4", "Storey height must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::not_found("Level", "abc").error_code(), "NOT_FOUND");
        assert_eq!(
            CalcError::invalid_input("x", "1", "bad").error_code(),
            "INVALID_INPUT"
        );
    }

    #[test]
    fn test_not_found_message() {
        let error = CalcError::not_found("Bracing section", "L1-NS");
        assert_eq!(error.to_string(), "Bracing section not found: L1-NS");
    }

    #[test]
    fn test_range_guards() {
        assert!(ensure_at_least("h", 2.4, 0.0).is_ok());
        assert!(ensure_at_least("h", -0.1, 0.0).is_err());
        assert!(ensure_at_least("h", f64::NAN, 0.0).is_err());
        assert!(ensure_in_range("phi_e", 0.3, 0.0, 1.0).is_ok());
        assert!(ensure_in_range("phi_e", 1.3, 0.0, 1.0).is_err());
        assert!(ensure_in_range("slope", f64::INFINITY, 0.0, 90.0).is_err());
    }
}
