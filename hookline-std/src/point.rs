//! Statically typed filter points.

use crate::{
    dispatch::SequentialDispatch,
    log,
    registry::{PriorityRegistry, Registration, Snapshot},
};
use hookline_core::{BoxError, Filter, Outcome};
use std::{fmt, sync::Arc};

/// An extension point: a registry of filters plus the dispatcher that runs
/// them.
///
/// Collaborators [`register`](Self::register) filters; the owner
/// [`apply`](Self::apply)s the point to an initial state. The shape of every
/// filter is fixed by the type parameters, so incompatible filters are
/// rejected by the compiler.
///
/// Cloning a point yields another handle to the same registry. Separately
/// constructed points never share filters.
///
/// # Example
///
/// ```rust,ignore
/// let before_request = FilterPoint::<Request, HeaderMap, BoxError>::named("before_request");
/// before_request.register(|req, headers: &HeaderMap| Outcome::next(req), -100);
///
/// let Outcome { state: req, error } = before_request.apply(req, &headers);
/// ```
pub struct FilterPoint<S, X: ?Sized = (), E = BoxError> {
    name: &'static str,
    registry: Arc<PriorityRegistry<dyn Filter<S, X, E>>>,
}

impl<S, X, E> FilterPoint<S, X, E>
where
    S: 'static,
    X: ?Sized + 'static,
    E: 'static,
{
    /// Create an empty point with a default name.
    pub fn new() -> Self {
        Self::named("filter")
    }

    /// Create an empty point with a custom name.
    ///
    /// The name is used in log messages to identify the point.
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
    pub fn register<F: Filter<S, X, E>>(&self, filter: F, priority: i32) {
        self.register_with(filter, Registration::new().with_priority(priority));
    }

    /// Register a filter with specified metadata.
    pub fn register_with<F: Filter<S, X, E>>(&self, filter: F, registration: Registration) {
        self.register_arc(Arc::new(filter), registration);
    }

    /// Register an already shared filter.
    pub fn register_arc(&self, filter: Arc<dyn Filter<S, X, E>>, registration: Registration) {
        let index = self.registry.add(filter, registration);
        log::registered(self.name, &registration, index, self.registry.len());
    }

    /// Run every registered filter against `state`.
    ///
    /// Filters registered while this call is running are not seen by it.
    pub fn apply(&self, state: S, extra: &X) -> Outcome<S, E> {
        let snapshot = self.registry.snapshot();
        SequentialDispatch.run(self.name, &snapshot, state, extra)
    }

    /// The current registry snapshot.
    pub fn snapshot(&self) -> Snapshot<dyn Filter<S, X, E>> {
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

    /// Split into a registering handle and an applying handle.
    ///
    /// Both share this point's registry.
    pub fn split(&self) -> (Registrar<S, X, E>, Applier<S, X, E>) {
        (Registrar(self.clone()), Applier(self.clone()))
    }
}

impl<S, X, E> Default for FilterPoint<S, X, E>
where
    S: 'static,
    X: ?Sized + 'static,
    E: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, X: ?Sized, E> Clone for FilterPoint<S, X, E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<S, X: ?Sized, E> fmt::Debug for FilterPoint<S, X, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterPoint")
            .field("name", &self.name)
            .field("filters", &self.registry.len())
            .finish()
    }
}

/// The registering half of a [`FilterPoint`].
pub struct Registrar<S, X: ?Sized = (), E = BoxError>(FilterPoint<S, X, E>);

impl<S, X, E> Registrar<S, X, E>
where
    S: 'static,
    X: ?Sized + 'static,
    E: 'static,
{
    /// Register a filter at `priority` (lower runs first).
    pub fn register<F: Filter<S, X, E>>(&self, filter: F, priority: i32) {
        self.0.register(filter, priority);
    }

    /// Register a filter with specified metadata.
    pub fn register_with<F: Filter<S, X, E>>(&self, filter: F, registration: Registration) {
        self.0.register_with(filter, registration);
    }
}

impl<S, X: ?Sized, E> Clone for Registrar<S, X, E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// The applying half of a [`FilterPoint`].
pub struct Applier<S, X: ?Sized = (), E = BoxError>(FilterPoint<S, X, E>);

impl<S, X, E> Applier<S, X, E>
where
    S: 'static,
    X: ?Sized + 'static,
    E: 'static,
{
    /// Run every registered filter against `state`.
    pub fn apply(&self, state: S, extra: &X) -> Outcome<S, E> {
        self.0.apply(state, extra)
    }
}

impl<S, X: ?Sized, E> Clone for Applier<S, X, E> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}
