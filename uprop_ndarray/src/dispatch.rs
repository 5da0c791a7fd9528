//! Named elementwise dispatch over uncertain operands.
//!
//! The array library hands this adapter an operation name plus operands;
//! the adapter routes recognized names to the core operator/elementary
//! layer and answers anything else with [`Dispatch::NotImplemented`], so
//! the library can fall back to its default handling. Nothing here ever
//! coerces an [`UncertainValue`] to a bare `f64` — that would silently
//! discard uncertainty — and no such conversion exists in the core crate.

use ndarray::Array1;
use thiserror::Error;
use tracing::debug;

use uprop_core::{PropagationError, UncertainValue};

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors surfaced by the dispatch adapter.
///
/// An unrecognized operation is NOT an error — it is the
/// [`Dispatch::NotImplemented`] sentinel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// Two array operands of different lengths.
    #[error("operand shapes differ: {left} vs {right}")]
    ShapeMismatch {
        /// Length of the left array operand.
        left: usize,
        /// Length of the right array operand.
        right: usize,
    },

    /// The routed core operation failed (domain error, zero divisor).
    #[error(transparent)]
    Propagation(#[from] PropagationError),
}

// ─── Operands and results ───────────────────────────────────────────

/// One operand of an elementwise operation.
#[derive(Debug, Clone)]
pub enum Operand {
    /// Scalar uncertain value.
    Value(UncertainValue),
    /// Scalar plain real.
    Real(f64),
    /// Array of uncertain values.
    Values(Array1<UncertainValue>),
    /// Array of plain reals.
    Reals(Array1<f64>),
}

/// Borrowed view of an operand at one element index.
enum Elem<'a> {
    Value(&'a UncertainValue),
    Real(f64),
}

impl Operand {
    /// Array length, `None` for scalars.
    fn len(&self) -> Option<usize> {
        match self {
            Operand::Value(_) | Operand::Real(_) => None,
            Operand::Values(a) => Some(a.len()),
            Operand::Reals(a) => Some(a.len()),
        }
    }

    fn is_uncertain(&self) -> bool {
        matches!(self, Operand::Value(_) | Operand::Values(_))
    }

    /// Element at `i`; scalars broadcast to every index.
    fn elem(&self, i: usize) -> Elem<'_> {
        match self {
            Operand::Value(v) => Elem::Value(v),
            Operand::Real(x) => Elem::Real(*x),
            Operand::Values(a) => Elem::Value(&a[i]),
            Operand::Reals(a) => Elem::Real(a[i]),
        }
    }
}

impl From<UncertainValue> for Operand {
    fn from(v: UncertainValue) -> Self {
        Operand::Value(v)
    }
}

impl From<f64> for Operand {
    fn from(x: f64) -> Self {
        Operand::Real(x)
    }
}

impl From<Array1<UncertainValue>> for Operand {
    fn from(a: Array1<UncertainValue>) -> Self {
        Operand::Values(a)
    }
}

impl From<Array1<f64>> for Operand {
    fn from(a: Array1<f64>) -> Self {
        Operand::Reals(a)
    }
}

impl From<Vec<UncertainValue>> for Operand {
    fn from(v: Vec<UncertainValue>) -> Self {
        Operand::Values(Array1::from_vec(v))
    }
}

/// Outcome of a dispatch attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Scalar result.
    Value(UncertainValue),
    /// Elementwise array result.
    Array(Array1<UncertainValue>),
    /// Operation not handled here — the caller should fall back to its
    /// default handling.
    NotImplemented,
}

// ─── Capability interface ───────────────────────────────────────────

/// Minimal capability interface registered at the array library's
/// generic-operation extension point.
pub trait ElementwiseHooks {
    /// Route a named unary operation.
    fn apply_unary(&self, op: &str, x: &Operand) -> Result<Dispatch, DispatchError>;

    /// Route a named binary operation.
    fn apply_binary(&self, op: &str, a: &Operand, b: &Operand)
    -> Result<Dispatch, DispatchError>;
}

/// The adapter itself. Stateless; one instance serves all threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct UncertainDispatch;

impl UncertainDispatch {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

impl ElementwiseHooks for UncertainDispatch {
    fn apply_unary(&self, op: &str, x: &Operand) -> Result<Dispatch, DispatchError> {
        if !x.is_uncertain() {
            debug!(op, "no uncertain operand, deferring");
            return Ok(Dispatch::NotImplemented);
        }

        let apply: fn(&UncertainValue) -> Result<UncertainValue, PropagationError> = match op {
            "negative" | "neg" => |v| Ok(-v),
            "sin" => |v| Ok(v.sin()),
            "cos" => |v| Ok(v.cos()),
            "exp" => |v| Ok(v.exp()),
            "log" | "ln" => |v| v.ln(),
            "sqrt" => |v| v.sqrt(),
            _ => {
                debug!(op, "unsupported elementwise operation, deferring");
                return Ok(Dispatch::NotImplemented);
            }
        };

        match x {
            Operand::Value(v) => Ok(Dispatch::Value(apply(v)?)),
            Operand::Values(arr) => {
                let mut out = Vec::with_capacity(arr.len());
                for v in arr {
                    out.push(apply(v)?);
                }
                Ok(Dispatch::Array(Array1::from_vec(out)))
            }
            // Real operands were deferred above.
            Operand::Real(_) | Operand::Reals(_) => Ok(Dispatch::NotImplemented),
        }
    }

    fn apply_binary(
        &self,
        op: &str,
        a: &Operand,
        b: &Operand,
    ) -> Result<Dispatch, DispatchError> {
        if !a.is_uncertain() && !b.is_uncertain() {
            debug!(op, "no uncertain operand, deferring");
            return Ok(Dispatch::NotImplemented);
        }

        let Some(bin) = BinOp::from_name(op) else {
            debug!(op, "unsupported elementwise operation, deferring");
            return Ok(Dispatch::NotImplemented);
        };

        if let (Some(left), Some(right)) = (a.len(), b.len())
            && left != right
        {
            return Err(DispatchError::ShapeMismatch { left, right });
        }

        match a.len().or(b.len()) {
            None => Ok(Dispatch::Value(bin.combine(a.elem(0), b.elem(0))?)),
            Some(n) => {
                let mut out = Vec::with_capacity(n);
                for i in 0..n {
                    out.push(bin.combine(a.elem(i), b.elem(i))?);
                }
                Ok(Dispatch::Array(Array1::from_vec(out)))
            }
        }
    }
}

// ─── Binary operation routing ───────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    /// Accepts both the short names and the numpy-style spellings.
    fn from_name(op: &str) -> Option<Self> {
        match op {
            "add" => Some(Self::Add),
            "subtract" | "sub" => Some(Self::Sub),
            "multiply" | "mul" => Some(Self::Mul),
            "divide" | "true_divide" | "div" => Some(Self::Div),
            _ => None,
        }
    }

    fn apply(
        self,
        a: &UncertainValue,
        b: &UncertainValue,
    ) -> Result<UncertainValue, PropagationError> {
        match self {
            Self::Add => Ok(a + b),
            Self::Sub => Ok(a - b),
            Self::Mul => Ok(a * b),
            Self::Div => a.checked_div(b),
        }
    }

    /// Apply at one element pair, lifting a plain real next to the
    /// uncertain side's registry.
    fn combine(self, a: Elem<'_>, b: Elem<'_>) -> Result<UncertainValue, DispatchError> {
        let out = match (a, b) {
            (Elem::Value(a), Elem::Value(b)) => self.apply(a, b)?,
            (Elem::Value(a), Elem::Real(x)) => self.apply(a, &a.constant_like(x))?,
            (Elem::Real(x), Elem::Value(b)) => self.apply(&b.constant_like(x), b)?,
            (Elem::Real(_), Elem::Real(_)) => {
                unreachable!("dispatch requires at least one uncertain operand")
            }
        };
        Ok(out)
    }
}
