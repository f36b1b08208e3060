//! Sequential execution of a registry snapshot.

use crate::{log, registry::Snapshot};
use hookline_core::{DynAsyncFilter, Filter, Outcome};

/// Runs filters one by one, lowest priority first.
///
/// Each filter receives the state returned by the one before it. The first
/// filter that halts ends the run: its state and error are returned and no
/// later filter is invoked. Panics raised by a filter are not caught.
#[derive(Debug, Default, Clone, Copy)]
pub struct SequentialDispatch;

impl SequentialDispatch {
    /// Run `snapshot` against `state`.
    pub fn run<S, X, E>(
        &self,
        point: &str,
        snapshot: &Snapshot<dyn Filter<S, X, E>>,
        state: S,
        extra: &X,
    ) -> Outcome<S, E>
    where
        S: 'static,
        X: ?Sized + 'static,
        E: 'static,
    {
        let mut state = state;
        for (index, entry) in snapshot.iter().enumerate() {
            log::running(point, entry.registration());

            let outcome = entry.filter().filter(state, extra);
            if outcome.is_halted() {
                log::halted(point, entry.registration(), index);
                return outcome;
            }
            state = outcome.state;
        }
        Outcome::next(state)
    }

    /// Run `snapshot` against `state`, awaiting each filter in turn.
    pub async fn run_async<S, X, E>(
        &self,
        point: &str,
        snapshot: &Snapshot<dyn DynAsyncFilter<S, X, E>>,
        state: S,
        extra: &X,
    ) -> Outcome<S, E>
    where
        S: Send + 'static,
        X: ?Sized + Sync + 'static,
        E: Send + 'static,
    {
        let mut state = state;
        for (index, entry) in snapshot.iter().enumerate() {
            log::running(point, entry.registration());

            let outcome = entry.filter().filter_dyn(state, extra).await;
            if outcome.is_halted() {
                log::halted(point, entry.registration(), index);
                return outcome;
            }
            state = outcome.state;
        }
        Outcome::next(state)
    }
}
