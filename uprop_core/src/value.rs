//! Uncertain value core: a nominal magnitude plus a sparse derivative map.
//!
//! An [`UncertainValue`] is the first-order Taylor expansion of some
//! function of the registry's independent variables around their nominal
//! values. The derivative map records ∂quantity/∂variable per
//! [`VariableId`]; an absent key means coefficient 0, and an empty map is
//! an exact constant. Values are immutable — every operation builds a new
//! instance — so they can be shared freely across threads once built.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::registry::{SigmaTable, VariableId, default_registry};

/// Sparse map from variable identity to partial-derivative coefficient.
pub type DerivativeMap = HashMap<VariableId, f64>;

/// A value with propagated first-order uncertainty.
#[derive(Debug, Clone)]
pub struct UncertainValue {
    nominal: f64,
    derivatives: DerivativeMap,
    /// Sigma table of the registry the variables in `derivatives` live in.
    table: Arc<SigmaTable>,
}

impl UncertainValue {
    /// Build a value directly from a nominal and a caller-supplied map.
    ///
    /// Allocates no variable. All ids in `derivatives` must already be
    /// registered in the registry that owns `table`.
    pub(crate) fn from_parts(
        nominal: f64,
        derivatives: DerivativeMap,
        table: Arc<SigmaTable>,
    ) -> Self {
        Self {
            nominal,
            derivatives,
            table,
        }
    }

    /// Best-estimate magnitude, ignoring uncertainty.
    #[inline]
    pub fn nominal(&self) -> f64 {
        self.nominal
    }

    /// Propagated variance: `Σ (c · sigma(id))²` over the derivative map.
    pub fn variance(&self) -> f64 {
        self.derivatives
            .iter()
            .filter_map(|(id, coeff)| {
                let sigma = self.table.sigma(*id)?;
                Some(coeff * sigma * (coeff * sigma))
            })
            .sum()
    }

    /// Propagated first-order standard deviation.
    pub fn stddev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Partial derivative of this quantity w.r.t. one variable.
    ///
    /// Returns 0.0 for variables the value does not depend on.
    #[inline]
    pub fn derivative(&self, id: VariableId) -> f64 {
        self.derivatives.get(&id).copied().unwrap_or(0.0)
    }

    /// True if the value carries no uncertainty sources at all.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.derivatives.is_empty()
    }

    /// An exact constant bound to the same registry as `self`.
    ///
    /// This is how plain reals are lifted when they appear as operands:
    /// zero derivative contribution, no registry traffic.
    pub fn constant_like(&self, nominal: f64) -> UncertainValue {
        UncertainValue::from_parts(nominal, DerivativeMap::new(), Arc::clone(&self.table))
    }

    pub(crate) fn derivatives(&self) -> &DerivativeMap {
        &self.derivatives
    }

    pub(crate) fn table_handle(&self) -> Arc<SigmaTable> {
        Arc::clone(&self.table)
    }

    /// Apply a unary chain rule: new nominal, every coefficient scaled by
    /// `factor` (the derivative of the outer function at the old nominal).
    pub(crate) fn map_coefficients(&self, nominal: f64, factor: f64) -> UncertainValue {
        let derivatives = self
            .derivatives
            .iter()
            .map(|(id, coeff)| (*id, coeff * factor))
            .collect();
        UncertainValue::from_parts(nominal, derivatives, Arc::clone(&self.table))
    }
}

/// Compares nominal and derivative map; the registry binding is not part
/// of a value's identity.
impl PartialEq for UncertainValue {
    fn eq(&self, other: &Self) -> bool {
        self.nominal == other.nominal && self.derivatives == other.derivatives
    }
}

impl fmt::Display for UncertainValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ± {}", self.nominal, self.stddev())
    }
}

/// Lifts a plain real to an exact constant on the default registry.
impl From<f64> for UncertainValue {
    fn from(nominal: f64) -> Self {
        default_registry().constant(nominal)
    }
}

// ─── Free-function accessors ────────────────────────────────────────

/// Nominal value of an uncertain quantity.
#[inline]
pub fn nominal(v: &UncertainValue) -> f64 {
    v.nominal()
}

/// Propagated standard deviation of an uncertain quantity.
#[inline]
pub fn stddev(v: &UncertainValue) -> f64 {
    v.stddev()
}
