//! Error types for hookline.
//!
//! - [`ConfigurationError`] - A filter or template has the wrong shape
//! - [`Halted`] - A filter stopped the chain
//! - [`BoxError`] - Erased error kind

use crate::signature::{Signature, Slot};
use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A filter or template whose shape cannot be used at a filter point.
///
/// Raised while a point is being set up (template construction or filter
/// registration), never while it is applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The shape describes a plain value, not a function.
    #[error("`{found}` is not callable")]
    NotCallable {
        /// The value slot that was supplied.
        found: Slot,
    },

    /// The result list does not end with an error slot.
    #[error("`{signature}` does not end with an error result")]
    MissingErrorSlot {
        /// The offending signature.
        signature: Signature,
    },

    /// A leading parameter and the result at the same position differ.
    #[error("`{signature}`: parameter {position} is `{param}` but result {position} is `{result}`")]
    StateMismatch {
        /// The offending signature.
        signature: Signature,
        /// Zero-based position of the mismatch.
        position: usize,
        /// The parameter slot at `position`.
        param: Slot,
        /// The result slot at `position`.
        result: Slot,
    },

    /// The result list is longer than the threaded state plus the error slot.
    #[error("`{signature}`: expected {expected} results, found {found}")]
    ResultArity {
        /// The offending signature.
        signature: Signature,
        /// Number of results the parameter list allows.
        expected: usize,
        /// Number of results declared.
        found: usize,
    },

    /// The filter threads different state than the template.
    #[error("filter `{candidate}` does not thread the state of `{template}`")]
    StateShapeMismatch {
        /// The filter point's template.
        template: Signature,
        /// The rejected filter.
        candidate: Signature,
    },

    /// The filter takes different extra parameters than the template.
    #[error("filter `{candidate}` does not take the extras of `{template}`")]
    ExtraMismatch {
        /// The filter point's template.
        template: Signature,
        /// The rejected filter.
        candidate: Signature,
    },
}

/// A chain error together with the state the failing filter returned.
///
/// Produced by [`Outcome::into_result`](crate::Outcome::into_result).
#[derive(Debug)]
pub struct Halted<S, E> {
    /// State returned by the filter that halted the chain.
    pub state: S,
    /// The error it signaled.
    pub error: E,
}

impl<S, E> Halted<S, E> {
    /// Split into state and error.
    pub fn into_parts(self) -> (S, E) {
        (self.state, self.error)
    }
}

impl<S, E: fmt::Display> fmt::Display for Halted<S, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "filter chain halted: {}", self.error)
    }
}

impl<S: fmt::Debug, E: std::error::Error + 'static> std::error::Error for Halted<S, E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
