//! # Error Types
//!
//! Structured error types for beam_core. Every failure of an analysis is a
//! single terminal [`BeamError`] carrying enough context for a caller to show
//! a human-readable reason, or to branch on [`BeamError::error_code`].
//!
//! ## Example
//!
//! ```rust
//! use beam_core::errors::{BeamError, BeamResult};
//!
//! fn check_length(length: f64) -> BeamResult<()> {
//!     if !(length > 0.0) {
//!         return Err(BeamError::invalid_input(
//!             "length",
//!             length.to_string(),
//!             "Beam length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for beam_core operations
pub type BeamResult<T> = Result<T, BeamError>;

/// Structured error type for beam analysis.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BeamError {
    /// A load or joint lies outside `[0, length]`, or a span has `start >= end`
    #[error("{subject} is out of beam bounds [0, {length}] m: {reason}")]
    OutOfBounds {
        subject: String,
        length: f64,
        reason: String,
    },

    /// More reaction unknowns than the three planar equilibrium equations
    #[error("The beam is statically indeterminate with {unknowns} unknowns")]
    Indeterminate { unknowns: usize },

    /// Fewer reaction unknowns than the three planar equilibrium equations
    #[error("The beam is unstable with only {unknowns} unknowns")]
    Unstable { unknowns: usize },

    /// Joint set is neither pinned + roller nor a single fixed support
    #[error("Unsupported joint configuration [{joints}]: {reason}")]
    UnsupportedConfiguration { joints: String, reason: String },

    /// A solved roller reaction pulls the beam down
    #[error("Roller joint at {pos} m has a negative (downward) reaction of {ry} kN")]
    InvalidSupport { pos: f64, ry: f64 },

    /// An unrecognized kind tag or a missing field was supplied to a factory
    #[error("Invalid constructor argument for '{field}': {value} - {reason}")]
    InvalidConstructorArgument {
        field: String,
        value: String,
        reason: String,
    },

    /// A numeric input (beam length, settings) is invalid
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A custom load expression failed to parse or evaluate
    #[error("Invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// A custom load was evaluated without a table integrated from it
    #[error("No effect table has been built for {load}")]
    MissingEffectTable { load: String },

    /// A custom load was evaluated with a table built for another sweep
    #[error(
        "Effect table was built for length {table_length} m / step {table_step} m, \
         but the sweep uses length {length} m / step {step} m"
    )]
    StaleEffectTable {
        table_length: f64,
        table_step: f64,
        length: f64,
        step: f64,
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
}

impl BeamError {
    /// Create an OutOfBounds error
    pub fn out_of_bounds(subject: impl Into<String>, length: f64, reason: impl Into<String>) -> Self {
        BeamError::OutOfBounds {
            subject: subject.into(),
            length,
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedConfiguration error
    pub fn unsupported_configuration(joints: impl Into<String>, reason: impl Into<String>) -> Self {
        BeamError::UnsupportedConfiguration {
            joints: joints.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConstructorArgument error
    pub fn invalid_argument(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BeamError::InvalidConstructorArgument {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BeamError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidExpression error
    pub fn invalid_expression(expression: impl Into<String>, reason: impl ToString) -> Self {
        BeamError::InvalidExpression {
            expression: expression.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl ToString) -> Self {
        BeamError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures raised while checking geometry and determinacy,
    /// before any reactions are solved.
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            BeamError::OutOfBounds { .. } | BeamError::Indeterminate { .. } | BeamError::Unstable { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BeamError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            BeamError::Indeterminate { .. } => "INDETERMINATE",
            BeamError::Unstable { .. } => "UNSTABLE",
            BeamError::UnsupportedConfiguration { .. } => "UNSUPPORTED_CONFIGURATION",
            BeamError::InvalidSupport { .. } => "INVALID_SUPPORT",
            BeamError::InvalidConstructorArgument { .. } => "INVALID_CONSTRUCTOR_ARGUMENT",
            BeamError::InvalidInput { .. } => "INVALID_INPUT",
            BeamError::InvalidExpression { .. } => "INVALID_EXPRESSION",
            BeamError::MissingEffectTable { .. } => "MISSING_EFFECT_TABLE",
            BeamError::StaleEffectTable { .. } => "STALE_EFFECT_TABLE",
            BeamError::FileError { .. } => "FILE_ERROR",
            BeamError::SerializationError { .. } => "SERIALIZATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for BeamError {
    fn from(err: serde_json::Error) -> Self {
        BeamError::SerializationError {
            reason: err.to_string(),
        }
    }
}
