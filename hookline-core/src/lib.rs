//! # hookline-core
//!
//! Core traits for the hookline filter chain.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! collaborators that only contribute filters and never own a filter point.
//! The registry, the dispatcher and the filter points themselves live in
//! `hookline-std`.
//!
//! # Vocabulary
//!
//! A **filter point** is an extension point owned by a host. Collaborators
//! register **filters** at a priority; the host applies the point to an
//! initial state and every filter, lowest priority first, receives the state
//! produced by the previous one together with the same read-only extras.
//!
//! - [`Filter`] - A synchronous filter: `(state, &extra) -> Outcome`
//! - [`AsyncFilter`] - The async counterpart, with [`DynAsyncFilter`] for
//!   trait objects
//! - [`Outcome`] - The state a filter hands on, plus an optional chain error
//!
//! # Signature Validation
//!
//! Statically typed filter points get their shape checked by the compiler.
//! Points whose shape is only known at runtime describe it with a
//! [`Template`] built from [`Slot`]s, and every candidate is checked against
//! it when registered. See [`signature`](crate::Template) for the rules.
//!
//! # Error Types
//!
//! - [`ConfigurationError`] - Setup-time shape incompatibility
//! - [`Halted`] - A chain error together with the state it stopped at
//! - [`BoxError`] - Erased error kind used by runtime-shaped filters

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod filter;
mod outcome;
mod signature;

// Re-exports
pub use error::{BoxError, ConfigurationError, Halted};
pub use filter::{AsyncFilter, DynAsyncFilter, Filter};
pub use outcome::Outcome;
pub use signature::{ErrorSlot, Shape, Signature, Slot, Template};
