//! # Error Types
//!
//! Structured error types for beam_core. The analysis entry point never
//! returns these to its caller; they travel between the internal stages
//! (solver, sampler, dice, file I/O) and are turned into explanation-log
//! entries at the boundary.
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length: f64) -> CalcResult<()> {
//!     if length <= 0.0 {
//!         return Err(CalcError::InvalidInput {
//!             field: "length".to_string(),
//!             value: length.to_string(),
//!             reason: "Length must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beam_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for beam analysis operations.
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

    /// More unknown reactions than independent equilibrium equations
    #[error("Statically indeterminate or unstable system: {unknowns} unknowns, {equations} equations")]
    StaticallyIndeterminate { unknowns: usize, equations: usize },

    /// The reaction system has no unique solution
    #[error("Reaction system could not be solved: {reason}")]
    SingularSystem { reason: String },

    /// A closed-form expression did not produce a finite number
    #[error("Could not evaluate {expression} at x = {position}: {reason}")]
    EvaluationFailed {
        expression: String,
        position: f64,
        reason: String,
    },

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

    /// Create a SingularSystem error
    pub fn singular(reason: impl Into<String>) -> Self {
        CalcError::SingularSystem {
            reason: reason.into(),
        }
    }

    /// Create an EvaluationFailed error
    pub fn evaluation_failed(expression: impl Into<String>, position: f64, reason: impl Into<String>) -> Self {
        CalcError::EvaluationFailed {
            expression: expression.into(),
            position,
            reason: reason.into(),
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
            CalcError::StaticallyIndeterminate { .. } => "STATICALLY_INDETERMINATE",
            CalcError::SingularSystem { .. } => "SINGULAR_SYSTEM",
            CalcError::EvaluationFailed { .. } => "EVALUATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}
