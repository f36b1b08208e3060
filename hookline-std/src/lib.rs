//! # hookline-std
//!
//! Registry, dispatcher and filter points for the hookline filter chain.
//!
//! This crate provides:
//! - **Filter points**: [`FilterPoint`] and its split handles [`Registrar`] and
//!   [`Applier`], plus [`AsyncFilterPoint`]
//! - **Runtime-shaped points**: [`dynamic::DynFilterPoint`]
//! - **Priority registry**: [`PriorityRegistry`] with copy-on-write [`Snapshot`]s
//! - **Dispatch**: [`SequentialDispatch`]
//! - **Testing helpers**: [`testing`]
//!
//! Enable the `tracing` feature to log registrations, filter runs and halts.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use hookline_core;

// Modules
pub mod async_point;
pub mod dispatch;
pub mod dynamic;
pub mod point;
pub mod registry;
pub mod testing;

mod log;

pub use async_point::AsyncFilterPoint;
pub use dispatch::SequentialDispatch;
pub use point::{Applier, FilterPoint, Registrar};
pub use registry::{PriorityEntry, PriorityRegistry, Registration, Snapshot};
