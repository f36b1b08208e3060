//! The value a filter hands on to the rest of the chain.

use crate::error::Halted;

/// Result of running a filter (or a whole chain).
///
/// The state is always present: a filter that halts the chain still returns
/// the state it produced, and that state is what the caller of `apply` gets
/// back next to the error.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an outcome may carry a chain error"]
pub struct Outcome<S, E> {
    /// The state produced so far.
    pub state: S,
    /// The chain error, if a filter signaled one.
    pub error: Option<E>,
}

impl<S, E> Outcome<S, E> {
    /// Continue with the next filter.
    pub fn next(state: S) -> Self {
        Self { state, error: None }
    }

    /// Stop the chain with `error`.
    pub fn halt(state: S, error: E) -> Self {
        Self {
            state,
            error: Some(error),
        }
    }

    /// Whether a filter signaled a chain error.
    pub fn is_halted(&self) -> bool {
        self.error.is_some()
    }

    /// Split into state and optional error.
    pub fn into_parts(self) -> (S, Option<E>) {
        (self.state, self.error)
    }

    /// Convert into a `Result`, keeping the state on the error side.
    pub fn into_result(self) -> Result<S, Halted<S, E>> {
        match self.error {
            None => Ok(self.state),
            Some(error) => Err(Halted {
                state: self.state,
                error,
            }),
        }
    }

    /// Transform the state, keeping the error.
    pub fn map_state<T>(self, f: impl FnOnce(S) -> T) -> Outcome<T, E> {
        Outcome {
            state: f(self.state),
            error: self.error,
        }
    }
}

impl<S, E> From<Result<S, (S, E)>> for Outcome<S, E> {
    fn from(result: Result<S, (S, E)>) -> Self {
        match result {
            Ok(state) => Self::next(state),
            Err((state, error)) => Self::halt(state, error),
        }
    }
}
