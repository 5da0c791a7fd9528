//! First-order uncertainty propagation engine.
//!
//! Represents a measured quantity as a nominal value plus a sparse map of
//! partial derivatives w.r.t. independent uncertainty sources, and carries
//! that linearization through arithmetic, elementary functions and
//! arbitrary black-box functions. Because derivative maps combine key-wise
//! per variable, reusing a source in one expression cancels or reinforces
//! its uncertainty exactly — `x - x` has stddev 0, `x * x` has stddev
//! `2·|x₀|·σ`.
//!
//! # Module Structure
//!
//! - [`registry`] - Variable identities and their standard deviations
//! - [`value`] - The [`UncertainValue`] core type and accessors
//! - [`ops`] - `+ − × ÷` and negation with chain-rule propagation
//! - [`elementary`] - `sin`, `cos`, `exp`, `ln`, `sqrt`
//! - [`batch`] - Vectorized construction/extraction helpers
//! - [`wrap`] - Finite-difference wrapper for black-box functions
//! - [`error`] - The [`PropagationError`] taxonomy
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use uprop_core::prelude::*;
//!
//! fn main() -> PropagationResult<()> {
//!     let reg = Registry::new();
//!     let length = reg.independent(10.0, 1.0)?;
//!     let width = reg.independent(2.0, 0.2)?;
//!     let ratio = &length / &width;
//!     assert_eq!(ratio.nominal(), 5.0);
//!     println!("{ratio}"); // 5 ± 0.707…
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod elementary;
pub mod error;
pub mod ops;
pub mod prelude;
pub mod registry;
pub mod value;
pub mod wrap;

pub use batch::{nominals, stddevs, uvals};
pub use elementary::{cos, exp, ln, sin, sqrt};
pub use error::{PropagationError, PropagationResult};
pub use registry::{Registry, VariableId, constant, default_registry, uval};
pub use value::{UncertainValue, nominal, stddev};
pub use wrap::{Arg, DEFAULT_EPSILON, WrappedFallibleFn, WrappedFn, wrap, wrap_fallible};

/// Initialize tracing for tests and example binaries.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
