//! Type-erased filters built from ordinary closures.

use super::value::{Extra, Value};
use hookline_core::{BoxError, ErrorSlot, Filter, Outcome, Shape, Signature, Slot};
use std::{any::Any, fmt};
use thiserror::Error;

/// Errors raised when erased arguments or results do not fit a filter.
///
/// These reach the caller as chain errors; registration-time checks make
/// them unreachable for arguments built from a point's own template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DynCallError {
    /// Wrong number of arguments.
    #[error("expected {expected} arguments, found {found}")]
    Arity {
        /// Arguments the filter takes.
        expected: usize,
        /// Arguments supplied.
        found: usize,
    },

    /// An argument has the wrong type.
    #[error("argument {position} is `{found}`, expected `{expected}`")]
    Argument {
        /// Zero-based position of the argument.
        position: usize,
        /// The slot the filter takes at `position`.
        expected: Slot,
        /// The slot supplied.
        found: Slot,
    },

    /// The filter's results do not end with an error value.
    #[error("filter returned no trailing error value")]
    MissingErrorSlot,

    /// The filter returned the wrong number of states.
    #[error("filter returned {found} states, expected {expected}")]
    StateArity {
        /// States the signature threads.
        expected: usize,
        /// States returned.
        found: usize,
    },

    /// A returned state has the wrong type.
    #[error("state {position} returned as `{found}`, expected `{expected}`")]
    State {
        /// Zero-based position of the state.
        position: usize,
        /// The slot the signature threads at `position`.
        expected: Slot,
        /// The slot returned.
        found: Slot,
    },
}

impl DynCallError {
    fn into_returned(self) -> Self {
        match self {
            Self::Arity { expected, found } => Self::StateArity { expected, found },
            Self::Argument {
                position,
                expected,
                found,
            } => Self::State {
                position,
                expected,
                found,
            },
            other => other,
        }
    }
}

/// Check `found` slot-by-slot against `expected`.
pub(crate) fn check_slots(
    expected: &[Slot],
    found: impl ExactSizeIterator<Item = Slot>,
) -> Result<(), DynCallError> {
    if found.len() != expected.len() {
        return Err(DynCallError::Arity {
            expected: expected.len(),
            found: found.len(),
        });
    }
    for (position, (&expected, found)) in expected.iter().zip(found).enumerate() {
        if expected != found {
            return Err(DynCallError::Argument {
                position,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// A result list a runtime-shaped filter can return.
///
/// Implemented for `()`, for a bare [`ErrorSlot`], and for tuples of up to
/// eight values. Only lists ending in [`ErrorSlot`] pass validation.
pub trait IntoResults: Send + 'static {
    /// Slots of the results, in order.
    fn slots() -> Vec<Slot>;

    /// Erase the results, in order.
    fn into_values(self) -> Vec<Value>;
}

impl IntoResults for () {
    fn slots() -> Vec<Slot> {
        Vec::new()
    }

    fn into_values(self) -> Vec<Value> {
        Vec::new()
    }
}

impl IntoResults for ErrorSlot {
    fn slots() -> Vec<Slot> {
        vec![Slot::error()]
    }

    fn into_values(self) -> Vec<Value> {
        vec![Value::new(self)]
    }
}

macro_rules! impl_into_results_tuple {
    ($($R:ident),+) => {
        impl<$($R,)+> IntoResults for ($($R,)+)
        where
            $($R: Any + Send,)+
        {
            fn slots() -> Vec<Slot> {
                vec![$(Slot::of::<$R>()),+]
            }

            #[allow(non_snake_case)]
            fn into_values(self) -> Vec<Value> {
                let ($($R,)+) = self;
                vec![$(Value::new($R)),+]
            }
        }
    };
}

impl_into_results_tuple!(R1);
impl_into_results_tuple!(R1, R2);
impl_into_results_tuple!(R1, R2, R3);
impl_into_results_tuple!(R1, R2, R3, R4);
impl_into_results_tuple!(R1, R2, R3, R4, R5);
impl_into_results_tuple!(R1, R2, R3, R4, R5, R6);
impl_into_results_tuple!(R1, R2, R3, R4, R5, R6, R7);
impl_into_results_tuple!(R1, R2, R3, R4, R5, R6, R7, R8);

type ErasedCall = dyn Fn(Vec<Value>) -> Outcome<Vec<Value>, BoxError> + Send + Sync;

/// A type-erased filter with a known [`Signature`].
///
/// Arguments are the states followed by the extras; the outcome carries the
/// states the filter returned.
pub struct DynFilter {
    signature: Signature,
    call: Box<ErasedCall>,
}

impl DynFilter {
    /// Erase a closure or function.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let filter = DynFilter::new(|n: i32, step: i32| -> (i32, ErrorSlot) { (n + step, None) });
    /// assert_eq!(filter.signature().to_string(), "fn(i32, i32) -> (i32, error)");
    /// ```
    pub fn new<F, Args>(filter: F) -> Self
    where
        F: IntoDynFilter<Args>,
    {
        filter.into_dyn()
    }

    /// Build a filter from a raw call and the signature it honors.
    ///
    /// The call receives the states followed by the extras. Unless it halts,
    /// it must return the states `signature` threads, in order; otherwise
    /// [`call`](Self::call) halts with [`DynCallError::StateArity`] or
    /// [`DynCallError::State`].
    pub fn from_call<C>(signature: Signature, call: C) -> Self
    where
        C: Fn(Vec<Value>) -> Outcome<Vec<Value>, BoxError> + Send + Sync + 'static,
    {
        Self {
            signature,
            call: Box::new(call),
        }
    }

    /// The filter's signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The filter's shape, for validation.
    pub fn shape(&self) -> Shape {
        Shape::Callable(self.signature.clone())
    }

    /// Invoke the filter with erased arguments.
    ///
    /// States returned without a chain error are checked against the
    /// signature's leading results.
    pub fn call(&self, args: Vec<Value>) -> Outcome<Vec<Value>, BoxError> {
        let outcome = (self.call)(args);
        if outcome.is_halted() {
            return outcome;
        }
        let threaded = match self.signature.results().split_last() {
            Some((_, states)) => states,
            None => &[],
        };
        match check_slots(threaded, outcome.state.iter().map(Value::slot)) {
            Ok(()) => outcome,
            Err(err) => Outcome::halt(outcome.state, Box::new(err.into_returned())),
        }
    }
}

impl Filter<Vec<Value>, [Extra], BoxError> for DynFilter {
    fn filter(&self, state: Vec<Value>, extra: &[Extra]) -> Outcome<Vec<Value>, BoxError> {
        let mut args = state;
        args.extend(extra.iter().map(Extra::to_value));
        self.call(args)
    }
}

impl fmt::Debug for DynFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynFilter")
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Conversion of closures and functions into [`DynFilter`]s.
///
/// Implemented for every `Fn(T1, .., Tk) -> R` with `k <= 8` and
/// `R: IntoResults`. The `Args` parameter only disambiguates arities.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be used as a runtime-shaped filter",
    label = "not a `Fn(..) -> (.., ErrorSlot)`",
    note = "Parameters must be `Send + 'static`; the return type must implement `IntoResults`."
)]
pub trait IntoDynFilter<Args>: Send + Sync + 'static {
    /// The signature derived from the closure's types.
    fn signature() -> Signature;

    /// Erase the closure.
    fn into_dyn(self) -> DynFilter;
}

fn take<T: Any>(args: &mut std::vec::IntoIter<Value>) -> T {
    match args.next().map(Value::downcast::<T>) {
        Some(Ok(value)) => value,
        // check_slots has matched every argument already.
        _ => unreachable!("argument slots are checked before the call"),
    }
}

fn collect(mut results: Vec<Value>) -> Outcome<Vec<Value>, BoxError> {
    match results.pop().map(Value::downcast::<ErrorSlot>) {
        Some(Ok(error)) => Outcome {
            state: results,
            error,
        },
        Some(Err(last)) => {
            results.push(last);
            Outcome::halt(results, Box::new(DynCallError::MissingErrorSlot))
        }
        None => Outcome::halt(results, Box::new(DynCallError::MissingErrorSlot)),
    }
}

macro_rules! impl_into_dyn_filter {
    ($($T:ident),*) => {
        impl<Func, Res, $($T,)*> IntoDynFilter<($($T,)*)> for Func
        where
            Func: Fn($($T),*) -> Res + Send + Sync + 'static,
            Res: IntoResults,
            $($T: Any + Send,)*
        {
            fn signature() -> Signature {
                let params: Vec<Slot> = vec![$(Slot::of::<$T>()),*];
                Signature::new(params, Res::slots())
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_dyn(self) -> DynFilter {
                let signature = <Self as IntoDynFilter<($($T,)*)>>::signature();
                let params = signature.params().to_vec();
                let states = signature.results().len().saturating_sub(1);
                let func = self;

                DynFilter::from_call(signature, move |mut args: Vec<Value>| {
                    if let Err(err) = check_slots(&params, args.iter().map(Value::slot)) {
                        args.truncate(states);
                        return Outcome::halt(args, Box::new(err));
                    }
                    let mut args = args.into_iter();
                    $(let $T = take::<$T>(&mut args);)*
                    collect(func($($T),*).into_values())
                })
            }
        }
    };
}

impl_into_dyn_filter!();
impl_into_dyn_filter!(T1);
impl_into_dyn_filter!(T1, T2);
impl_into_dyn_filter!(T1, T2, T3);
impl_into_dyn_filter!(T1, T2, T3, T4);
impl_into_dyn_filter!(T1, T2, T3, T4, T5);
impl_into_dyn_filter!(T1, T2, T3, T4, T5, T6);
impl_into_dyn_filter!(T1, T2, T3, T4, T5, T6, T7);
impl_into_dyn_filter!(T1, T2, T3, T4, T5, T6, T7, T8);
