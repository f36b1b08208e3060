//! # Filters
//!
//! A filter is one link of a filter chain. It receives the state produced by
//! the previous filter (or the initial state), the extras shared by the whole
//! chain, and returns an [`Outcome`]: the new state, and optionally an error
//! that stops the chain.
//!
//! # Shape
//!
//! - `S` - the threaded state. Use a tuple to thread several values.
//! - `X` - the extras, borrowed by every filter. Interior mutability
//!   (`Mutex`, atomics) turns an extra into a side channel.
//! - `E` - the chain error kind.
//!
//! # Sync vs Async
//!
//! [`Filter`] runs on the caller's thread. [`AsyncFilter`] returns a future
//! that the chain awaits before starting the next filter. Registries that hold
//! async filters as trait objects use [`DynAsyncFilter`].

use crate::outcome::Outcome;
use futures::future::BoxFuture;
use std::future::Future;

/// A synchronous link of a filter chain.
///
/// Closures of the form `Fn(S, &X) -> Outcome<S, E>` are filters.
///
/// # Example
///
/// ```rust,ignore
/// let bump = |n: u32, _: &()| Outcome::<u32, BoxError>::next(n + 1);
/// point.register(bump, 0);
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Filter<{S}, {X}, {E}>`",
    label = "missing `Filter` implementation",
    note = "Filters take `({S}, &{X})` and return `Outcome<{S}, {E}>`."
)]
pub trait Filter<S, X: ?Sized, E>: Send + Sync + 'static {
    /// Transform `state`, or stop the chain.
    fn filter(&self, state: S, extra: &X) -> Outcome<S, E>;
}

impl<F, S, X, E> Filter<S, X, E> for F
where
    X: ?Sized,
    F: Fn(S, &X) -> Outcome<S, E> + Send + Sync + 'static,
{
    fn filter(&self, state: S, extra: &X) -> Outcome<S, E> {
        (self)(state, extra)
    }
}

/// An asynchronous link of a filter chain.
///
/// This trait uses native `async fn` for static dispatch.
/// For trait objects, use [`DynAsyncFilter`].
///
/// Closures returning a `'static` future are async filters; clone what the
/// future needs out of the extras before moving into it.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `AsyncFilter<{S}, {X}, {E}>`",
    label = "missing `AsyncFilter` implementation",
    note = "Async filters take `({S}, &{X})` and resolve to `Outcome<{S}, {E}>`."
)]
pub trait AsyncFilter<S, X: ?Sized, E>: Send + Sync + 'static {
    /// Transform `state`, or stop the chain.
    fn filter(&self, state: S, extra: &X) -> impl Future<Output = Outcome<S, E>> + Send;
}

impl<F, Fut, S, X, E> AsyncFilter<S, X, E> for F
where
    X: ?Sized,
    F: Fn(S, &X) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Outcome<S, E>> + Send,
{
    fn filter(&self, state: S, extra: &X) -> impl Future<Output = Outcome<S, E>> + Send {
        (self)(state, extra)
    }
}

/// Object-safe version of [`AsyncFilter`].
pub trait DynAsyncFilter<S, X: ?Sized, E>: Send + Sync + 'static {
    /// Transform `state`, or stop the chain (dynamic dispatch version).
    fn filter_dyn<'a>(&'a self, state: S, extra: &'a X) -> BoxFuture<'a, Outcome<S, E>>;
}

// Blanket implementation: any AsyncFilter is a DynAsyncFilter.
impl<T, S, X, E> DynAsyncFilter<S, X, E> for T
where
    T: AsyncFilter<S, X, E>,
    S: Send + 'static,
    X: ?Sized + Sync + 'static,
    E: Send + 'static,
{
    fn filter_dyn<'a>(&'a self, state: S, extra: &'a X) -> BoxFuture<'a, Outcome<S, E>> {
        Box::pin(AsyncFilter::filter(self, state, extra))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;

    impl Filter<i64, (), &'static str> for Double {
        fn filter(&self, state: i64, _extra: &()) -> Outcome<i64, &'static str> {
            Outcome::next(state * 2)
        }
    }

    fn run_sync<F: Filter<i64, (), &'static str>>(f: &F, state: i64) -> Outcome<i64, &'static str> {
        Filter::filter(f, state, &())
    }

    #[test]
    fn test_struct_filter() {
        assert_eq!(run_sync(&Double, 21), Outcome::next(42));
    }

    #[test]
    fn test_closure_filter() {
        let f = |state: i64, _: &()| {
            if state < 0 {
                Outcome::halt(state, "negative")
            } else {
                Outcome::next(state + 1)
            }
        };
        assert_eq!(run_sync(&f, 1), Outcome::next(2));
        assert_eq!(run_sync(&f, -1), Outcome::halt(-1, "negative"));
    }

    #[test]
    fn test_unsized_extra() {
        let f = |state: usize, extra: &[u8]| Outcome::<usize, ()>::next(state + extra.len());
        assert_eq!(Filter::filter(&f, 1, &[1u8, 2, 3][..]), Outcome::next(4));
    }

    #[tokio::test]
    async fn test_async_closure_through_dyn() {
        let f = |state: String, extra: &String| {
            let suffix = extra.clone();
            async move { Outcome::<String, ()>::next(state + &suffix) }
        };
        let boxed: Box<dyn DynAsyncFilter<String, String, ()>> = Box::new(f);

        let outcome = boxed.filter_dyn("a".to_string(), &"b".to_string()).await;
        assert_eq!(outcome, Outcome::next("ab".to_string()));
    }
}
