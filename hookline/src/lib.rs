//! # hookline - Prioritized Filter Chains
//!
//! `hookline` lets a host expose named extension points ("filter points")
//! through which collaborators transform a value. Collaborators register
//! filters at a priority; the host applies the point to an initial state and
//! every filter, lowest priority first, receives the state produced by the
//! previous one together with shared read-only extras. Any filter can halt
//! the chain by reporting an error.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hookline::prelude::*;
//!
//! let before_save = FilterPoint::<Document, User>::named("before_save");
//!
//! // Collaborators
//! before_save.register(|doc: Document, _: &User| Outcome::next(doc.trimmed()), 0);
//! before_save.register(
//!     |doc: Document, user: &User| {
//!         if user.can_write(&doc) {
//!             Outcome::next(doc)
//!         } else {
//!             Outcome::halt(doc, "forbidden".into())
//!         }
//!     },
//!     -10,
//! );
//!
//! // Host
//! let doc = before_save.apply(doc, &user).into_result()?;
//! ```
//!
//! ## Runtime-shaped Points
//!
//! When a point's shape is only known at runtime, use
//! [`dynamic::DynFilterPoint`]. Its template and every registered closure are
//! checked by the signature validator and rejected with a
//! [`ConfigurationError`] if they do not fit.
//!
//! ## Features
//!
//! - `tracing`: log registrations, filter runs and halts with `tracing`

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use hookline_core::{
    // Filters
    AsyncFilter,
    // Errors
    BoxError,
    ConfigurationError,
    DynAsyncFilter,
    // Signature validation
    ErrorSlot,
    Filter,
    Halted,
    // Outcome
    Outcome,
    Shape,
    Signature,
    Slot,
    Template,
};

pub use hookline_std::{
    Applier, AsyncFilterPoint, FilterPoint, PriorityEntry, PriorityRegistry, Registrar,
    Registration, SequentialDispatch, Snapshot,
};

/// Runtime-shaped filter points.
pub mod dynamic {
    pub use hookline_std::dynamic::{
        DynCallError, DynFilter, DynFilterPoint, Extra, IntoDynFilter, IntoResults, Value,
    };
}

/// Testing utilities.
pub mod testing {
    pub use hookline_std::testing::{CallLog, CountingFilter, Fail, Recorder};
}

/// Prelude module - common imports for hookline.
///
/// # Usage
///
/// ```rust,ignore
/// use hookline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        AsyncFilter, AsyncFilterPoint, BoxError, ConfigurationError, ErrorSlot, Filter,
        FilterPoint, Halted, Outcome, Registration,
        dynamic::{DynFilterPoint, Extra, Value},
    };
}
