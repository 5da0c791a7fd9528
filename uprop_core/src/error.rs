//! Error types for uncertainty propagation.
//!
//! Propagation over valid inputs is an exact numerical computation with no
//! transient-failure class, so nothing here is retryable: invalid domains
//! and malformed batch inputs fail fast at the call that introduces them.
//! Errors raised by a user function inside the generic wrapper are not
//! represented here — they pass through to the caller with the user's own
//! error type (see [`crate::wrap::wrap_fallible`]).

use thiserror::Error;

/// Errors that can occur while constructing or combining uncertain values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    /// Standard deviation supplied at registration is negative or NaN.
    #[error("standard deviation must be non-negative, got {sigma}")]
    InvalidSigma {
        /// The rejected sigma.
        sigma: f64,
    },

    /// Batch construction received sequences of different lengths.
    #[error("batch length mismatch: {nominals} nominals vs {sigmas} sigmas")]
    LengthMismatch {
        /// Number of nominal values supplied.
        nominals: usize,
        /// Number of standard deviations supplied.
        sigmas: usize,
    },

    /// Elementary function applied outside its domain.
    #[error("{function} is undefined at nominal value {nominal}")]
    Domain {
        /// Function name (`"ln"`, `"sqrt"`).
        function: &'static str,
        /// The offending nominal value.
        nominal: f64,
    },

    /// Division by a value whose nominal is exactly zero.
    #[error("division by a value with nominal exactly zero")]
    DivisionByZero,
}

/// Convenience result alias for propagation operations.
pub type PropagationResult<T> = Result<T, PropagationError>;
