//! ndarray dispatch adapter for uncertainty propagation.
//!
//! Lets [`uprop_core`] values participate in an array library's generic
//! elementwise-operation dispatch: the library's extension hook calls
//! [`ElementwiseHooks::apply_unary`] / [`apply_binary`] with an operation
//! name and operands (scalars or `Array1`s, at least one uncertain), and
//! the adapter routes the call through the core chain-rule layer.
//! Operations the adapter does not implement come back as the
//! [`Dispatch::NotImplemented`] sentinel rather than an error, deferring
//! to the library's own handling.
//!
//! The core crate knows nothing about `ndarray`; the dependency points
//! only this way.
//!
//! [`apply_binary`]: ElementwiseHooks::apply_binary

pub mod dispatch;

pub use dispatch::{Dispatch, DispatchError, ElementwiseHooks, Operand, UncertainDispatch};
