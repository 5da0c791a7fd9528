//! Prelude module for common re-exports.
//!
//! `use uprop_core::prelude::*;` brings in everything needed for typical
//! propagation work without listing individual paths.

// ─── Core types ─────────────────────────────────────────────────────
pub use crate::error::{PropagationError, PropagationResult};
pub use crate::registry::{Registry, VariableId};
pub use crate::value::UncertainValue;

// ─── Default-registry conveniences ──────────────────────────────────
pub use crate::batch::{nominals, stddevs, uvals};
pub use crate::registry::{constant, uval};
pub use crate::value::{nominal, stddev};

// ─── Elementary functions ───────────────────────────────────────────
pub use crate::elementary::{cos, exp, ln, sin, sqrt};

// ─── Generic wrapper ────────────────────────────────────────────────
pub use crate::wrap::{Arg, DEFAULT_EPSILON, WrappedFallibleFn, WrappedFn, wrap, wrap_fallible};
