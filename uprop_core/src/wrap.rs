//! Generic differentiable wrapper — finite-difference fallback for
//! functions with no built-in chain rule.
//!
//! [`wrap`] lifts any `Fn(&[f64]) -> f64` into an uncertainty-propagating
//! callable: one nominal evaluation plus a symmetric difference quotient
//! per uncertain argument (`2n + 1` evaluations total; plain reals cost
//! nothing extra). The resulting partials are folded key-wise into one
//! output map, so arguments sharing a variable stay correlated exactly as
//! with the built-in operators.
//!
//! Arity is the length of the argument slice — the wrapped function sees
//! exactly one `f64` per supplied [`Arg`], no reflection involved.
//!
//! Accuracy is governed entirely by the step size versus the function's
//! local curvature and floating-point cancellation; there is no adaptive
//! step sizing. With the default step `1e-8`, a smooth function agrees
//! with its closed-form derivative to roughly 1e-6 relative.

use std::sync::Arc;

use tracing::trace;

use crate::registry::{SigmaTable, default_registry};
use crate::value::{DerivativeMap, UncertainValue};

/// Default finite-difference step size.
pub const DEFAULT_EPSILON: f64 = 1e-8;

// ─── Arguments ──────────────────────────────────────────────────────

/// One argument to a wrapped function: uncertain or plain real.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Carries a derivative map; perturbed during differentiation.
    Value(UncertainValue),
    /// Held fixed at its value; contributes no derivatives.
    Real(f64),
}

impl Arg {
    #[inline]
    fn nominal(&self) -> f64 {
        match self {
            Arg::Value(v) => v.nominal(),
            Arg::Real(x) => *x,
        }
    }
}

impl From<UncertainValue> for Arg {
    fn from(v: UncertainValue) -> Self {
        Arg::Value(v)
    }
}

impl From<&UncertainValue> for Arg {
    fn from(v: &UncertainValue) -> Self {
        Arg::Value(v.clone())
    }
}

impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Arg::Real(x)
    }
}

// ─── Infallible wrapper ─────────────────────────────────────────────

/// An uncertainty-propagating view of a plain numeric function.
///
/// Built by [`wrap`]; stateless apart from the step size, so one instance
/// may be called concurrently from any number of threads.
#[derive(Debug, Clone)]
pub struct WrappedFn<F> {
    f: F,
    epsilon: f64,
}

/// Lift a black-box numeric function into an uncertainty-propagating one,
/// with the default step size [`DEFAULT_EPSILON`].
pub fn wrap<F>(f: F) -> WrappedFn<F>
where
    F: Fn(&[f64]) -> f64,
{
    WrappedFn {
        f,
        epsilon: DEFAULT_EPSILON,
    }
}

impl<F> WrappedFn<F>
where
    F: Fn(&[f64]) -> f64,
{
    /// Override the finite-difference step size.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` is not strictly positive.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        assert!(epsilon > 0.0, "epsilon must be strictly positive");
        self.epsilon = epsilon;
        self
    }

    /// Evaluate with uncertainty propagation.
    pub fn call(&self, args: &[Arg]) -> UncertainValue {
        // Infallible functions can't fail mid-plan, so reuse the fallible
        // engine with an uninhabitable error path.
        let result: Result<UncertainValue, std::convert::Infallible> =
            propagate(|xs| Ok((self.f)(xs)), self.epsilon, args);
        match result {
            Ok(v) => v,
            Err(never) => match never {},
        }
    }
}

// ─── Fallible wrapper ───────────────────────────────────────────────

/// Like [`WrappedFn`] for functions that can fail.
///
/// Any error raised by the wrapped function during any evaluation —
/// nominal or perturbed — returns to the caller unchanged, with the
/// function's own error type.
#[derive(Debug, Clone)]
pub struct WrappedFallibleFn<F> {
    f: F,
    epsilon: f64,
}

/// Lift a fallible numeric function into an uncertainty-propagating one.
pub fn wrap_fallible<F, E>(f: F) -> WrappedFallibleFn<F>
where
    F: Fn(&[f64]) -> Result<f64, E>,
{
    WrappedFallibleFn {
        f,
        epsilon: DEFAULT_EPSILON,
    }
}

impl<F> WrappedFallibleFn<F> {
    /// Override the finite-difference step size.
    ///
    /// # Panics
    ///
    /// Panics if `epsilon` is not strictly positive.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        assert!(epsilon > 0.0, "epsilon must be strictly positive");
        self.epsilon = epsilon;
        self
    }

    /// Evaluate with uncertainty propagation.
    ///
    /// # Errors
    ///
    /// Passes through the first error the wrapped function raises.
    pub fn call<E>(&self, args: &[Arg]) -> Result<UncertainValue, E>
    where
        F: Fn(&[f64]) -> Result<f64, E>,
    {
        propagate(&self.f, self.epsilon, args)
    }
}

// ─── Propagation engine ─────────────────────────────────────────────

/// Symmetric-difference propagation shared by both wrappers.
fn propagate<F, E>(f: F, epsilon: f64, args: &[Arg]) -> Result<UncertainValue, E>
where
    F: Fn(&[f64]) -> Result<f64, E>,
{
    let nominals: Vec<f64> = args.iter().map(Arg::nominal).collect();
    let result_nominal = f(&nominals)?;

    let mut output = DerivativeMap::new();
    let mut table: Option<Arc<SigmaTable>> = None;
    let mut probe = nominals.clone();
    let mut evaluations = 1usize;

    for (i, arg) in args.iter().enumerate() {
        let Arg::Value(v) = arg else { continue };
        if table.is_none() {
            table = Some(v.table_handle());
        }
        // A constant-valued argument has nothing to contribute; skip its
        // two evaluations.
        if v.derivatives().is_empty() {
            continue;
        }

        let x = nominals[i];
        probe[i] = x + epsilon;
        let above = f(&probe)?;
        probe[i] = x - epsilon;
        let below = f(&probe)?;
        probe[i] = x;
        evaluations += 2;

        let partial = (above - below) / (2.0 * epsilon);
        for (id, coeff) in v.derivatives() {
            *output.entry(*id).or_insert(0.0) += partial * coeff;
        }
    }
    output.retain(|_, coeff| *coeff != 0.0);

    trace!(
        args = args.len(),
        evaluations, epsilon, "finite-difference propagation"
    );

    let table = table.unwrap_or_else(|| default_registry().table_handle());
    Ok(UncertainValue::from_parts(result_nominal, output, table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn relative_close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn single_argument_partial() {
        let reg = Registry::new();
        let x = reg.independent(2.0, 0.1).unwrap();
        // f(x) = x³, f'(2) = 12 → σ = 1.2.
        let cube = wrap(|xs: &[f64]| xs[0].powi(3));
        let y = cube.call(&[Arg::from(&x)]);
        assert!(relative_close(y.nominal(), 8.0, 1e-12));
        assert!(relative_close(y.stddev(), 1.2, 1e-6));
    }

    #[test]
    fn plain_reals_contribute_nothing() {
        let reg = Registry::new();
        let x = reg.independent(3.0, 0.5).unwrap();
        let scaled = wrap(|xs: &[f64]| xs[0] * xs[1]);
        let y = scaled.call(&[Arg::from(&x), Arg::from(4.0)]);
        assert!(relative_close(y.nominal(), 12.0, 1e-12));
        assert!(relative_close(y.stddev(), 2.0, 1e-6));
    }

    #[test]
    fn shared_variable_stays_correlated() {
        let reg = Registry::new();
        let x = reg.independent(10.0, 1.0).unwrap();
        // f(a, b) = a − b with both slots fed the same variable: the two
        // partials (+1, −1) cancel key-wise.
        let diff = wrap(|xs: &[f64]| xs[0] - xs[1]);
        let y = diff.call(&[Arg::from(&x), Arg::from(&x)]);
        assert!(y.nominal().abs() < 1e-12);
        assert!(y.stddev() < 1e-6);
    }

    #[test]
    fn matches_builtin_chain_rule() {
        let reg = Registry::new();
        let x = reg.independent(0.7, 0.2).unwrap();
        let numeric = wrap(|xs: &[f64]| xs[0].sin()).call(&[Arg::from(&x)]);
        let analytic = x.sin();
        assert!(relative_close(numeric.stddev(), analytic.stddev(), 1e-6));
    }

    #[test]
    fn all_constant_arguments_give_exact_result() {
        let f = wrap(|xs: &[f64]| xs[0] + xs[1]);
        let y = f.call(&[Arg::from(1.0), Arg::from(2.0)]);
        assert_eq!(y.nominal(), 3.0);
        assert_eq!(y.stddev(), 0.0);
        assert!(y.is_constant());
    }

    #[test]
    fn custom_epsilon() {
        let reg = Registry::new();
        let x = reg.independent(1.0, 0.1).unwrap();
        let f = wrap(|xs: &[f64]| xs[0] * xs[0]).with_epsilon(1e-6);
        let y = f.call(&[Arg::from(&x)]);
        assert!(relative_close(y.stddev(), 0.2, 1e-4));
    }

    #[test]
    #[should_panic(expected = "epsilon must be strictly positive")]
    fn nonpositive_epsilon_rejected() {
        let _ = wrap(|xs: &[f64]| xs[0]).with_epsilon(0.0);
    }

    #[test]
    fn fallible_error_passes_through_unaltered() {
        #[derive(Debug, PartialEq)]
        struct Boom(&'static str);

        let reg = Registry::new();
        let x = reg.independent(0.0, 1.0).unwrap();
        let f = wrap_fallible(|xs: &[f64]| {
            if xs[0] < 0.0 {
                Err(Boom("negative probe"))
            } else {
                Ok(xs[0].sqrt())
            }
        });
        // The −epsilon probe below 0 trips the user error.
        let err = f.call(&[Arg::from(&x)]).unwrap_err();
        assert_eq!(err, Boom("negative probe"));
    }

    #[test]
    fn fallible_success_propagates() {
        let reg = Registry::new();
        let x = reg.independent(4.0, 0.5).unwrap();
        let f = wrap_fallible(|xs: &[f64]| Ok::<_, std::convert::Infallible>(xs[0].sqrt()));
        let y = f.call(&[Arg::from(&x)]).unwrap();
        assert!(relative_close(y.nominal(), 2.0, 1e-12));
        assert!(relative_close(y.stddev(), 0.125, 1e-6));
    }
}
