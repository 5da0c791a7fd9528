//! Variable registry — identities and standard deviations of independent
//! uncertainty sources.
//!
//! Every independent measurement gets a fresh [`VariableId`] and a fixed
//! sigma, stored once in the registry. Derived values never allocate ids;
//! they only reference existing ones through their derivative maps, which
//! is what makes correlation tracking exact.
//!
//! The registry is an explicit, session-scoped object: create one per test
//! or per computation session with [`Registry::new`], or use the
//! process-wide default behind the free functions ([`uval`], [`constant`]).
//! Ids grow monotonically and are never reused or deleted — one per
//! measurement is an acceptable cost.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::trace;

use crate::error::{PropagationError, PropagationResult};
use crate::value::{DerivativeMap, UncertainValue};

// ─── VariableId ─────────────────────────────────────────────────────

/// Unique identity of one independent uncertainty source.
///
/// Opaque; ordering only reflects allocation order within a single
/// registry. Concurrently issued ids have no observable relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u64);

impl VariableId {
    /// Raw counter value, for diagnostics.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// ─── Sigma table ────────────────────────────────────────────────────

/// Shared interior of a [`Registry`]: the id counter and the sigma table.
///
/// The counter is the sole point of mutation for identity; the table takes
/// a write lock only on registration and read locks on stddev evaluation.
#[derive(Debug, Default)]
pub(crate) struct SigmaTable {
    next_id: AtomicU64,
    sigmas: RwLock<HashMap<VariableId, f64>>,
}

impl SigmaTable {
    /// Allocate a fresh id and record its sigma. Caller validates sigma.
    fn register(&self, sigma: f64) -> VariableId {
        let id = VariableId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sigmas.write().insert(id, sigma);
        id
    }

    /// Sigma of a registered variable, `None` if the id is unknown here.
    pub(crate) fn sigma(&self, id: VariableId) -> Option<f64> {
        self.sigmas.read().get(&id).copied()
    }

    fn len(&self) -> usize {
        self.sigmas.read().len()
    }
}

// ─── Registry ───────────────────────────────────────────────────────

/// Issues [`VariableId`]s and stores their fixed standard deviations.
///
/// Cloning is cheap and shares the interior, so a registry handle can be
/// passed freely across threads. Uniqueness of ids is guaranteed under
/// concurrent [`register`](Registry::register) calls.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    table: Arc<SigmaTable>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new independent variable with standard deviation `sigma`.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::InvalidSigma`] if `sigma` is negative
    /// or NaN.
    pub fn register(&self, sigma: f64) -> PropagationResult<VariableId> {
        // `!(sigma >= 0.0)` also catches NaN.
        if !(sigma >= 0.0) {
            return Err(PropagationError::InvalidSigma { sigma });
        }
        let id = self.table.register(sigma);
        trace!(id = id.raw(), sigma, "registered independent variable");
        Ok(id)
    }

    /// Create an independent uncertain value `nominal ± sigma`.
    ///
    /// Allocates a fresh variable whose derivative map is `{id: 1.0}`.
    ///
    /// # Errors
    ///
    /// Returns [`PropagationError::InvalidSigma`] if `sigma` is negative
    /// or NaN.
    pub fn independent(&self, nominal: f64, sigma: f64) -> PropagationResult<UncertainValue> {
        let id = self.register(sigma)?;
        let mut derivatives = DerivativeMap::with_capacity(1);
        derivatives.insert(id, 1.0);
        Ok(UncertainValue::from_parts(
            nominal,
            derivatives,
            Arc::clone(&self.table),
        ))
    }

    /// Create an exact constant: empty derivative map, zero stddev.
    ///
    /// Allocates no variable and causes no registry traffic.
    pub fn constant(&self, nominal: f64) -> UncertainValue {
        UncertainValue::from_parts(nominal, DerivativeMap::new(), Arc::clone(&self.table))
    }

    /// Standard deviation of a registered variable.
    pub fn sigma(&self, id: VariableId) -> Option<f64> {
        self.table.sigma(id)
    }

    /// Number of variables registered so far.
    pub fn variable_count(&self) -> usize {
        self.table.len()
    }

    pub(crate) fn table_handle(&self) -> Arc<SigmaTable> {
        Arc::clone(&self.table)
    }
}

// ─── Process-default registry ───────────────────────────────────────

static DEFAULT_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide default registry backing the free-function API.
///
/// Isolated tests should prefer a fresh [`Registry`].
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}

/// Create an independent uncertain value on the default registry.
///
/// Shorthand for `default_registry().independent(nominal, sigma)`.
pub fn uval(nominal: f64, sigma: f64) -> PropagationResult<UncertainValue> {
    default_registry().independent(nominal, sigma)
}

/// Create an exact constant on the default registry.
pub fn constant(nominal: f64) -> UncertainValue {
    default_registry().constant(nominal)
}
