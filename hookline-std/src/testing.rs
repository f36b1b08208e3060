//! Testing utilities for hookline.
//!
//! This module provides filters that make the order and number of
//! invocations observable.
//!
//! # Features
//!
//! - [`CallLog`]: A shared log of filter labels, in invocation order
//! - [`Recorder`]: A filter that logs its label and passes the state through
//! - [`Fail`]: A filter that logs its label and halts the chain
//! - [`CountingFilter`]: A filter that counts invocations

use hookline_core::{AsyncFilter, Filter, Outcome};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Call Log
// ============================================================================

/// A shared, append-only log of filter labels.
///
/// # Example
///
/// ```rust,ignore
/// let log = CallLog::new();
/// point.register(Recorder::new("b", &log), 1);
/// point.register(Recorder::new("a", &log), 0);
///
/// point.apply(state, &extra);
/// assert_eq!(log.entries(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<&'static str>>>,
}

impl CallLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label.
    pub fn record(&self, label: &'static str) {
        self.entries.lock().push(label);
    }

    /// Get a copy of the logged labels.
    pub fn entries(&self) -> Vec<&'static str> {
        self.entries.lock().clone()
    }

    /// Get the number of logged labels.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

// ============================================================================
// Recorder
// ============================================================================

/// A filter that logs its label and hands the state on unchanged.
#[derive(Debug, Clone)]
pub struct Recorder {
    label: &'static str,
    log: CallLog,
}

impl Recorder {
    /// Create a recorder writing to `log`.
    pub fn new(label: &'static str, log: &CallLog) -> Self {
        Self {
            label,
            log: log.clone(),
        }
    }
}

impl<S, X, E> Filter<S, X, E> for Recorder
where
    S: 'static,
    X: ?Sized + 'static,
    E: 'static,
{
    fn filter(&self, state: S, _extra: &X) -> Outcome<S, E> {
        self.log.record(self.label);
        Outcome::next(state)
    }
}

impl<S, X, E> AsyncFilter<S, X, E> for Recorder
where
    S: Send + 'static,
    X: ?Sized + Sync + 'static,
    E: 'static,
{
    async fn filter(&self, state: S, _extra: &X) -> Outcome<S, E> {
        self.log.record(self.label);
        Outcome::next(state)
    }
}

// ============================================================================
// Fail
// ============================================================================

/// A filter that logs its label and halts the chain with a fixed error.
#[derive(Debug, Clone)]
pub struct Fail<E> {
    label: &'static str,
    log: CallLog,
    error: E,
}

impl<E> Fail<E> {
    /// Create a failing filter writing to `log`.
    pub fn new(label: &'static str, log: &CallLog, error: E) -> Self {
        Self {
            label,
            log: log.clone(),
            error,
        }
    }
}

impl<S, X, E> Filter<S, X, E> for Fail<E>
where
    S: 'static,
    X: ?Sized + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn filter(&self, state: S, _extra: &X) -> Outcome<S, E> {
        self.log.record(self.label);
        Outcome::halt(state, self.error.clone())
    }
}

impl<S, X, E> AsyncFilter<S, X, E> for Fail<E>
where
    S: Send + 'static,
    X: ?Sized + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    async fn filter(&self, state: S, _extra: &X) -> Outcome<S, E> {
        self.log.record(self.label);
        Outcome::halt(state, self.error.clone())
    }
}

// ============================================================================
// Counting Filter
// ============================================================================

/// A filter that counts invocations and passes the state through.
///
/// Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct CountingFilter {
    count: Arc<AtomicUsize>,
}

impl CountingFilter {
    /// Create a new counting filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<S, X, E> Filter<S, X, E> for CountingFilter
where
    S: 'static,
    X: ?Sized + 'static,
    E: 'static,
{
    fn filter(&self, state: S, _extra: &X) -> Outcome<S, E> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Outcome::next(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_log() {
        let log = CallLog::new();
        assert!(log.is_empty());

        log.record("a");
        log.clone().record("b");
        assert_eq!(log.entries(), ["a", "b"]);
        assert_eq!(log.len(), 2);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_fail_halts_with_state() {
        let log = CallLog::new();
        let fail = Fail::new("f", &log, "boom");

        let outcome: Outcome<i32, &str> = Filter::filter(&fail, 9, &());
        assert_eq!(outcome, Outcome::halt(9, "boom"));
        assert_eq!(log.entries(), ["f"]);
    }

    #[test]
    fn test_counting_filter_shares_count() {
        let counter = CountingFilter::new();
        let clone = counter.clone();

        let _: Outcome<(), ()> = Filter::filter(&clone, (), &());
        let _: Outcome<(), ()> = Filter::filter(&clone, (), &());
        assert_eq!(counter.count(), 2);

        counter.reset();
        assert_eq!(clone.count(), 0);
    }
}
