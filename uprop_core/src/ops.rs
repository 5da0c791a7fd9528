//! Arithmetic operators with chain-rule propagation.
//!
//! Each operator combines operand derivative maps key-wise, so repeated
//! uses of the same variable cancel or reinforce exactly instead of being
//! treated as independent. A plain `f64` on either side is lifted to an
//! exact constant bound to the other operand's registry (zero derivative
//! contribution, no registry traffic).
//!
//! The `/` operator panics when the divisor's nominal is exactly zero;
//! [`UncertainValue::checked_div`] is the non-panicking form.

use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use crate::error::{PropagationError, PropagationResult};
use crate::registry::SigmaTable;
use crate::value::{DerivativeMap, UncertainValue};

// ─── Map combination ────────────────────────────────────────────────

/// Key-wise sum `left ⊕ right_sign·right`, dropping exact-zero entries so
/// full cancellation yields an empty map.
fn combine(left: &DerivativeMap, right: &DerivativeMap, right_sign: f64) -> DerivativeMap {
    let mut out = left.clone();
    for (id, coeff) in right {
        *out.entry(*id).or_insert(0.0) += right_sign * coeff;
    }
    prune(&mut out);
    out
}

/// Absent key and coefficient 0 are the same thing; keep the map canonical.
fn prune(map: &mut DerivativeMap) {
    map.retain(|_, coeff| *coeff != 0.0);
}

/// Result values inherit the left operand's registry unless the left side
/// is a lifted constant and the right is not.
fn result_table(a: &UncertainValue, b: &UncertainValue) -> Arc<SigmaTable> {
    if a.is_constant() && !b.is_constant() {
        b.table_handle()
    } else {
        a.table_handle()
    }
}

// ─── Operator implementations ───────────────────────────────────────

fn add_values(a: &UncertainValue, b: &UncertainValue) -> UncertainValue {
    UncertainValue::from_parts(
        a.nominal() + b.nominal(),
        combine(a.derivatives(), b.derivatives(), 1.0),
        result_table(a, b),
    )
}

fn sub_values(a: &UncertainValue, b: &UncertainValue) -> UncertainValue {
    UncertainValue::from_parts(
        a.nominal() - b.nominal(),
        combine(a.derivatives(), b.derivatives(), -1.0),
        result_table(a, b),
    )
}

fn mul_values(a: &UncertainValue, b: &UncertainValue) -> UncertainValue {
    // d(ab) = nb·da ⊕ na·db
    let mut out = DerivativeMap::with_capacity(a.derivatives().len() + b.derivatives().len());
    for (id, coeff) in a.derivatives() {
        out.insert(*id, coeff * b.nominal());
    }
    for (id, coeff) in b.derivatives() {
        *out.entry(*id).or_insert(0.0) += coeff * a.nominal();
    }
    prune(&mut out);
    UncertainValue::from_parts(a.nominal() * b.nominal(), out, result_table(a, b))
}

fn div_values(a: &UncertainValue, b: &UncertainValue) -> UncertainValue {
    match a.checked_div(b) {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}

impl UncertainValue {
    /// Divide, failing instead of panicking on a zero-nominal divisor.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::DivisionByZero`] if the divisor's
    /// nominal value is exactly `0.0`.
    pub fn checked_div(&self, rhs: &UncertainValue) -> PropagationResult<UncertainValue> {
        let nb = rhs.nominal();
        if nb == 0.0 {
            return Err(PropagationError::DivisionByZero);
        }
        // d(a/b) = (1/nb)·da ⊕ (−na/nb²)·db
        let inv = 1.0 / nb;
        let scale = -self.nominal() / (nb * nb);
        let mut out =
            DerivativeMap::with_capacity(self.derivatives().len() + rhs.derivatives().len());
        for (id, coeff) in self.derivatives() {
            out.insert(*id, coeff * inv);
        }
        for (id, coeff) in rhs.derivatives() {
            *out.entry(*id).or_insert(0.0) += coeff * scale;
        }
        prune(&mut out);
        Ok(UncertainValue::from_parts(
            self.nominal() / nb,
            out,
            result_table(self, rhs),
        ))
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $impl_fn:ident) => {
        impl $trait<&UncertainValue> for &UncertainValue {
            type Output = UncertainValue;
            fn $method(self, rhs: &UncertainValue) -> UncertainValue {
                $impl_fn(self, rhs)
            }
        }

        impl $trait<UncertainValue> for &UncertainValue {
            type Output = UncertainValue;
            fn $method(self, rhs: UncertainValue) -> UncertainValue {
                $impl_fn(self, &rhs)
            }
        }

        impl $trait<&UncertainValue> for UncertainValue {
            type Output = UncertainValue;
            fn $method(self, rhs: &UncertainValue) -> UncertainValue {
                $impl_fn(&self, rhs)
            }
        }

        impl $trait<UncertainValue> for UncertainValue {
            type Output = UncertainValue;
            fn $method(self, rhs: UncertainValue) -> UncertainValue {
                $impl_fn(&self, &rhs)
            }
        }

        impl $trait<f64> for &UncertainValue {
            type Output = UncertainValue;
            fn $method(self, rhs: f64) -> UncertainValue {
                let rhs = self.constant_like(rhs);
                $impl_fn(self, &rhs)
            }
        }

        impl $trait<f64> for UncertainValue {
            type Output = UncertainValue;
            fn $method(self, rhs: f64) -> UncertainValue {
                let rhs = self.constant_like(rhs);
                $impl_fn(&self, &rhs)
            }
        }

        impl $trait<&UncertainValue> for f64 {
            type Output = UncertainValue;
            fn $method(self, rhs: &UncertainValue) -> UncertainValue {
                let lhs = rhs.constant_like(self);
                $impl_fn(&lhs, rhs)
            }
        }

        impl $trait<UncertainValue> for f64 {
            type Output = UncertainValue;
            fn $method(self, rhs: UncertainValue) -> UncertainValue {
                let lhs = rhs.constant_like(self);
                $impl_fn(&lhs, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add_values);
impl_binary_op!(Sub, sub, sub_values);
impl_binary_op!(Mul, mul, mul_values);
impl_binary_op!(Div, div, div_values);

impl Neg for &UncertainValue {
    type Output = UncertainValue;
    fn neg(self) -> UncertainValue {
        self.map_coefficients(-self.nominal(), -1.0)
    }
}

impl Neg for UncertainValue {
    type Output = UncertainValue;
    fn neg(self) -> UncertainValue {
        -&self
    }
}
