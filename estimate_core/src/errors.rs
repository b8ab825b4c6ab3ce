//! # Error Types
//!
//! Structured error types for estimate_core. Every calculator stage returns
//! `CalcResult<T>`; the pipeline stores a failed stage's error in that
//! stage's result slot so a single missing price never sinks the whole run.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::errors::{CalcError, CalcResult};
//!
//! fn require_floors(floors: u32) -> CalcResult<()> {
//!     if floors == 0 {
//!         return Err(CalcError::invalid_input(
//!             "number_of_floors",
//!             floors.to_string(),
//!             "At least one floor is required",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for estimate_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimation operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (wrong type, unparseable, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required project field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// The price table has no entry for a material, or the entry lacks the field
    #[error("Missing price: '{material}.{field}' not found in price table")]
    MissingPrice { material: String, field: String },

    /// The price table entry exists but is not a number
    #[error("Malformed price: '{material}.{field}' = {value} is not a number")]
    MalformedPrice {
        material: String,
        field: String,
        value: String,
    },

    /// A stage ran before the result it depends on was computed
    #[error("{stage}: upstream result '{upstream}' not found - run {upstream} first")]
    MissingUpstream { stage: String, upstream: String },

    /// A derived result slot was written twice in one run
    #[error("Result '{slot}' has already been computed for this run")]
    AlreadyComputed { slot: String },

    /// Calculation failed (arithmetic produced a non-finite value, etc.)
    #[error("Calculation failed: {calculation_type} - {reason}")]
    CalculationFailed {
        calculation_type: String,
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
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        CalcError::MissingField {
            field: field.into(),
        }
    }

    /// Create a MissingPrice error
    pub fn missing_price(material: impl Into<String>, field: impl Into<String>) -> Self {
        CalcError::MissingPrice {
            material: material.into(),
            field: field.into(),
        }
    }

    /// Create a MalformedPrice error
    pub fn malformed_price(
        material: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        CalcError::MalformedPrice {
            material: material.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a MissingUpstream error
    pub fn missing_upstream(stage: impl Into<String>, upstream: impl Into<String>) -> Self {
        CalcError::MissingUpstream {
            stage: stage.into(),
            upstream: upstream.into(),
        }
    }

    /// Create a CalculationFailed error
    pub fn calculation_failed(
        calculation_type: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::CalculationFailed {
            calculation_type: calculation_type.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// True for errors caused by the price table rather than project inputs
    pub fn is_price_error(&self) -> bool {
        matches!(self, CalcError::MissingPrice { .. } | CalcError::MalformedPrice { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MissingField { .. } => "MISSING_FIELD",
            CalcError::MissingPrice { .. } => "MISSING_PRICE",
            CalcError::MalformedPrice { .. } => "MALFORMED_PRICE",
            CalcError::MissingUpstream { .. } => "MISSING_UPSTREAM",
            CalcError::AlreadyComputed { .. } => "ALREADY_COMPUTED",
            CalcError::CalculationFailed { .. } => "CALCULATION_FAILED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::missing_price("steel", "price_per_ton");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MissingPrice"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(
            CalcError::missing_upstream("Steel", "gray_structure").error_code(),
            "MISSING_UPSTREAM"
        );
        assert!(CalcError::malformed_price("door", "price_per_sft", "\"n/a\"").is_price_error());
        assert!(!CalcError::missing_field("x").is_price_error());
    }

    #[test]
    fn test_missing_upstream_message_names_upstream() {
        let msg = CalcError::missing_upstream("Steel", "gray_structure").to_string();
        assert!(msg.contains("gray_structure"));
    }
}
