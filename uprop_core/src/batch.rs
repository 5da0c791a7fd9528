//! Batch helpers — vectorized construction and extraction.
//!
//! Thin wrappers over [`Registry::independent`] and the value accessors;
//! no new propagation semantics.

use crate::error::{PropagationError, PropagationResult};
use crate::registry::{Registry, default_registry};
use crate::value::UncertainValue;

impl Registry {
    /// Create one independent value per `(nominal, sigma)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::LengthMismatch`] if the slices differ in
    /// length and [`PropagationError::InvalidSigma`] on the first negative
    /// sigma. Both checks run before any variable is registered — variables
    /// cannot be deleted, so a half-registered batch would leak ids.
    pub fn independent_many(
        &self,
        nominals: &[f64],
        sigmas: &[f64],
    ) -> PropagationResult<Vec<UncertainValue>> {
        if nominals.len() != sigmas.len() {
            return Err(PropagationError::LengthMismatch {
                nominals: nominals.len(),
                sigmas: sigmas.len(),
            });
        }
        if let Some(&sigma) = sigmas.iter().find(|s| !(**s >= 0.0)) {
            return Err(PropagationError::InvalidSigma { sigma });
        }
        nominals
            .iter()
            .zip(sigmas)
            .map(|(&n, &s)| self.independent(n, s))
            .collect()
    }
}

/// Batch [`uval`](crate::registry::uval) on the default registry.
pub fn uvals(nominals: &[f64], sigmas: &[f64]) -> PropagationResult<Vec<UncertainValue>> {
    default_registry().independent_many(nominals, sigmas)
}

/// Nominal value of every element.
pub fn nominals(values: &[UncertainValue]) -> Vec<f64> {
    values.iter().map(UncertainValue::nominal).collect()
}

/// Propagated standard deviation of every element.
pub fn stddevs(values: &[UncertainValue]) -> Vec<f64> {
    values.iter().map(UncertainValue::stddev).collect()
}
