//! Elementary functions with chain-rule propagation.
//!
//! Each function scales every derivative coefficient by the function's own
//! derivative at the nominal value. `sin`, `cos` and `exp` are total;
//! `ln` and `sqrt` fail fast outside their domains.
//!
//! Domain boundary policy: `sqrt` accepts a nominal of exactly 0 — only
//! negative nominals are a domain error — and its derivative factor there
//! is `+∞`, so any nonzero coefficient surfaces as an infinite stddev.
//! `ln` rejects nominals ≤ 0, including 0.

use crate::error::{PropagationError, PropagationResult};
use crate::value::UncertainValue;

impl UncertainValue {
    /// Sine. `d(sin x) = cos(x₀)·dx`.
    pub fn sin(&self) -> UncertainValue {
        self.map_coefficients(self.nominal().sin(), self.nominal().cos())
    }

    /// Cosine. `d(cos x) = −sin(x₀)·dx`.
    pub fn cos(&self) -> UncertainValue {
        self.map_coefficients(self.nominal().cos(), -self.nominal().sin())
    }

    /// Exponential. `d(exp x) = exp(x₀)·dx`.
    pub fn exp(&self) -> UncertainValue {
        let e = self.nominal().exp();
        self.map_coefficients(e, e)
    }

    /// Natural logarithm. `d(ln x) = dx/x₀`.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::Domain`] if the nominal value is ≤ 0.
    pub fn ln(&self) -> PropagationResult<UncertainValue> {
        let n = self.nominal();
        if n <= 0.0 {
            return Err(PropagationError::Domain {
                function: "ln",
                nominal: n,
            });
        }
        Ok(self.map_coefficients(n.ln(), 1.0 / n))
    }

    /// Square root. `d(√x) = dx/(2·√x₀)`.
    ///
    /// At a nominal of exactly 0 the derivative factor is `+∞`.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::Domain`] if the nominal value is < 0.
    pub fn sqrt(&self) -> PropagationResult<UncertainValue> {
        let n = self.nominal();
        if n < 0.0 {
            return Err(PropagationError::Domain {
                function: "sqrt",
                nominal: n,
            });
        }
        let root = n.sqrt();
        Ok(self.map_coefficients(root, 0.5 / root))
    }
}

// ─── Free-function forms ────────────────────────────────────────────
//
// Each accepts an `UncertainValue` or a plain `f64` (lifted to an exact
// constant on the default registry).

/// Sine of an uncertain quantity.
pub fn sin(x: impl Into<UncertainValue>) -> UncertainValue {
    x.into().sin()
}

/// Cosine of an uncertain quantity.
pub fn cos(x: impl Into<UncertainValue>) -> UncertainValue {
    x.into().cos()
}

/// Exponential of an uncertain quantity.
pub fn exp(x: impl Into<UncertainValue>) -> UncertainValue {
    x.into().exp()
}

/// Natural logarithm of an uncertain quantity.
pub fn ln(x: impl Into<UncertainValue>) -> PropagationResult<UncertainValue> {
    x.into().ln()
}

/// Square root of an uncertain quantity.
pub fn sqrt(x: impl Into<UncertainValue>) -> PropagationResult<UncertainValue> {
    x.into().sqrt()
}
