//! Logging events emitted by filter points.
//!
//! Everything here compiles to nothing unless the `tracing` feature is on.

use crate::registry::Registration;
use std::fmt::Display;

#[inline]
pub(crate) fn registered(point: &str, registration: &Registration, index: usize, total: usize) {
    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            point,
            priority = registration.priority,
            label = registration.label,
            index,
            total,
            "registered filter"
        );
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = (point, registration, index, total);
    }
}

#[inline]
pub(crate) fn running(point: &str, registration: &Registration) {
    #[cfg(feature = "tracing")]
    {
        tracing::trace!(
            point,
            priority = registration.priority,
            label = registration.label,
            "running filter"
        );
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = (point, registration);
    }
}

#[inline]
pub(crate) fn halted(point: &str, registration: &Registration, index: usize) {
    #[cfg(feature = "tracing")]
    {
        tracing::debug!(
            point,
            priority = registration.priority,
            label = registration.label,
            index,
            "filter chain halted"
        );
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = (point, registration, index);
    }
}

#[inline]
pub(crate) fn rejected(point: &str, what: &str, error: &dyn Display) {
    #[cfg(feature = "tracing")]
    {
        tracing::debug!(point, %error, "rejected {what}");
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = (point, what, error);
    }
}
