//! Filter points whose filters are asynchronous.

use crate::{
    dispatch::SequentialDispatch,
    log,
    registry::{PriorityRegistry, Registration, Snapshot},
};
use hookline_core::{AsyncFilter, BoxError, DynAsyncFilter, Outcome};
use std::{fmt, sync::Arc};

/// A [`FilterPoint`](crate::FilterPoint) for [`AsyncFilter`]s.
///
/// `apply` awaits each filter before starting the next; filters of one
/// `apply` never run concurrently. Nothing is spawned: the chain runs inside
/// the caller's task.
pub struct AsyncFilterPoint<S, X: ?Sized = (), E = BoxError> {
    name: &'static str,
    registry: Arc<PriorityRegistry<dyn DynAsyncFilter<S, X, E>>>,
}

impl<S, X, E> AsyncFilterPoint<S, X, E>
where
    S: Send + 'static,
    X: ?Sized + Sync + 'static,
    E: Send + 'static,
{
    /// Create an empty point with a default name.
    pub fn new() -> Self {
        Self::named("async_filter")
    }

    /// Create an empty point with a custom name.
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            registry: Arc::new(PriorityRegistry::new()),
        }
    }

    /// The point's name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Register a filter at `priority` (lower runs first).
    pub fn register<F: AsyncFilter<S, X, E>>(&self, filter: F, priority: i32) {
        self.register_with(filter, Registration::new().with_priority(priority));
    }

    /// Register a filter with specified metadata.
    pub fn register_with<F: AsyncFilter<S, X, E>>(&self, filter: F, registration: Registration) {
        let index = self.registry.add(Arc::new(filter), registration);
        log::registered(self.name, &registration, index, self.registry.len());
    }

    /// Run every registered filter against `state`.
    pub async fn apply(&self, state: S, extra: &X) -> Outcome<S, E> {
        let snapshot = self.registry.snapshot();
        SequentialDispatch
            .run_async(self.name, &snapshot, state, extra)
            .await
    }

    /// The current registry snapshot.
    pub fn snapshot(&self) -> Snapshot<dyn DynAsyncFilter<S, X, E>> {
        self.registry.snapshot()
    }

    /// Get the number of registered filters.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

impl<S, X, E> Default for AsyncFilterPoint<S, X, E>
where
    S: Send + 'static,
    X: ?Sized + Sync + 'static,
    E: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, X: ?Sized, E> Clone for AsyncFilterPoint<S, X, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S, X: ?Sized, E> fmt::Debug for AsyncFilterPoint<S, X, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncFilterPoint")
            .field("name", &self.name)
            .field("filters", &self.registry.len())
            .finish()
    }
}
