//! Runtime-shaped filter points.
//!
//! Use these when the shape of a point is only known at runtime, e.g. when it
//! is described by a plugin manifest. States and extras travel as type-erased
//! [`Value`]s and [`Extra`]s; every filter's [`Signature`] is derived from its
//! closure type and checked against the point's [`Template`] when it is
//! registered.
//!
//! For shapes known at compile time, prefer [`FilterPoint`], which needs no
//! runtime checks.
//!
//! [`Signature`]: hookline_core::Signature
//! [`Template`]: hookline_core::Template
//! [`FilterPoint`]: crate::FilterPoint

pub mod filter;
pub mod point;
pub mod value;

pub use filter::{DynCallError, DynFilter, IntoDynFilter, IntoResults};
pub use point::DynFilterPoint;
pub use value::{Extra, Value};
