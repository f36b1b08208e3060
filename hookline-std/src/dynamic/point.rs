//! The runtime-shaped filter point.

use super::{
    filter::{DynFilter, IntoDynFilter, check_slots},
    value::{Extra, Value},
};
use crate::{log, point::FilterPoint, registry::Registration};
use hookline_core::{BoxError, ConfigurationError, Outcome, Shape, Template};
use std::{fmt, sync::Arc};

/// A filter point whose shape is a runtime [`Template`].
///
/// Every filter is checked against the template when it is registered; a
/// filter of the wrong shape is rejected with a [`ConfigurationError`] and
/// never reaches the registry.
///
/// # Example
///
/// ```rust,ignore
/// let point = DynFilterPoint::of::<fn(i32, String) -> (i32, ErrorSlot), _>()?;
/// point.register(|n: i32, who: String| -> (i32, ErrorSlot) { (n + 1, None) }, 0)?;
///
/// let outcome = point.apply(vec![Value::new(0_i32)], &[Extra::new(String::from("me"))]);
/// ```
#[derive(Clone)]
pub struct DynFilterPoint {
    template: Arc<Template>,
    point: FilterPoint<Vec<Value>, [Extra], BoxError>,
}

impl DynFilterPoint {
    /// Create a point for `shape`.
    ///
    /// Fails if `shape` is not a well-formed filter shape.
    pub fn new(shape: impl Into<Shape>) -> Result<Self, ConfigurationError> {
        Self::named("dyn_filter", shape)
    }

    /// Create a named point for `shape`.
    pub fn named(name: &'static str, shape: impl Into<Shape>) -> Result<Self, ConfigurationError> {
        let template = Template::new(shape).inspect_err(|err| log::rejected(name, "template", err))?;
        Ok(Self {
            template: Arc::new(template),
            point: FilterPoint::named(name),
        })
    }

    /// Create a point shaped like the function type `F`.
    ///
    /// ```rust,ignore
    /// let point = DynFilterPoint::of::<fn(u32) -> (u32, ErrorSlot), _>()?;
    /// ```
    pub fn of<F, Args>() -> Result<Self, ConfigurationError>
    where
        F: IntoDynFilter<Args>,
    {
        Self::new(F::signature())
    }

    /// The point's name.
    pub fn name(&self) -> &'static str {
        self.point.name()
    }

    /// The template every filter must match.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Register a closure at `priority` (lower runs first).
    pub fn register<F, Args>(&self, filter: F, priority: i32) -> Result<(), ConfigurationError>
    where
        F: IntoDynFilter<Args>,
    {
        self.register_with(filter, Registration::new().with_priority(priority))
    }

    /// Register a closure with specified metadata.
    pub fn register_with<F, Args>(
        &self,
        filter: F,
        registration: Registration,
    ) -> Result<(), ConfigurationError>
    where
        F: IntoDynFilter<Args>,
    {
        self.validate(&Shape::Callable(F::signature()))?;
        self.point.register_with(filter.into_dyn(), registration);
        Ok(())
    }

    /// Register an already erased filter.
    pub fn register_dyn(
        &self,
        filter: DynFilter,
        registration: Registration,
    ) -> Result<(), ConfigurationError> {
        self.validate(&filter.shape())?;
        self.point.register_with(filter, registration);
        Ok(())
    }

    /// Run every registered filter against `states`.
    ///
    /// `states` and `extras` must match the template slot by slot; otherwise
    /// the chain halts with a [`DynCallError`](super::DynCallError) before
    /// any filter runs. A filter that returns states of the wrong shape
    /// halts the chain the same way.
    pub fn apply(&self, states: Vec<Value>, extras: &[Extra]) -> Outcome<Vec<Value>, BoxError> {
        let found = states
            .iter()
            .map(Value::slot)
            .chain(extras.iter().map(Extra::slot))
            .collect::<Vec<_>>();
        if let Err(err) = check_slots(self.template.signature().params(), found.into_iter()) {
            log::rejected(self.name(), "arguments", &err);
            return Outcome::halt(states, Box::new(err));
        }
        self.point.apply(states, extras)
    }

    /// Get the number of registered filters.
    pub fn len(&self) -> usize {
        self.point.len()
    }

    /// Check if no filter is registered.
    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    fn validate(&self, shape: &Shape) -> Result<(), ConfigurationError> {
        self.template
            .check(shape)
            .inspect_err(|err| log::rejected(self.name(), "filter", err))
    }
}

impl fmt::Debug for DynFilterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynFilterPoint")
            .field("name", &self.name())
            .field("template", &self.template.signature().to_string())
            .field("filters", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamic::DynCallError;
    use hookline_core::{ErrorSlot, Signature};

    fn ints(outcome: &Outcome<Vec<Value>, BoxError>) -> Vec<i32> {
        outcome
            .state
            .iter()
            .filter_map(|v| v.downcast_ref::<i32>().copied())
            .collect()
    }

    #[test]
    fn test_template_from_fn_type() {
        let point = DynFilterPoint::of::<fn(i32, bool) -> (i32, ErrorSlot), _>().unwrap();
        assert_eq!(point.template().state_arity(), 1);
        assert_eq!(point.template().extra_arity(), 1);
    }

    #[test]
    fn test_malformed_template_is_rejected() {
        let err = DynFilterPoint::new(Shape::value::<i32>()).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotCallable { .. }));

        let err = DynFilterPoint::of::<fn(i32) -> (String, ErrorSlot), _>().unwrap_err();
        assert!(matches!(err, ConfigurationError::StateMismatch { .. }));
    }

    #[test]
    fn test_register_and_apply() {
        let point = DynFilterPoint::of::<fn(i32, i32) -> (i32, ErrorSlot), _>().unwrap();
        point
            .register(|n: i32, step: i32| -> (i32, ErrorSlot) { (n * step, None) }, 1)
            .unwrap();
        point
            .register(|n: i32, step: i32| -> (i32, ErrorSlot) { (n + step, None) }, 0)
            .unwrap();

        let outcome = point.apply(vec![Value::new(1_i32)], &[Extra::new(2_i32)]);
        assert!(outcome.error.is_none());
        assert_eq!(ints(&outcome), [6]);
    }

    #[test]
    fn test_incompatible_filter_is_rejected() {
        let point = DynFilterPoint::of::<fn(i32, bool) -> (i32, ErrorSlot), _>().unwrap();

        let err = point
            .register(|n: i32| -> (i32, ErrorSlot) { (n, None) }, 0)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::ExtraMismatch { .. }));

        let err = point
            .register(|n: u8, b: bool| -> (u8, ErrorSlot) { (if b { n } else { 0 }, None) }, 0)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::StateShapeMismatch { .. }));

        let err = point
            .register(|n: i32, _: bool| -> (i32, i32) { (n, n) }, 0)
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingErrorSlot { .. }));

        assert!(point.is_empty());
    }

    #[test]
    fn test_register_dyn_validates() {
        let point = DynFilterPoint::new(Signature::default().error()).unwrap();
        let filter = DynFilter::new(|n: i32| -> (i32, ErrorSlot) { (n, None) });

        let err = point.register_dyn(filter, Registration::new()).unwrap_err();
        assert!(matches!(err, ConfigurationError::StateShapeMismatch { .. }));
    }

    #[test]
    fn test_mismatched_arguments_halt_before_filters() {
        let point = DynFilterPoint::of::<fn(i32) -> (i32, ErrorSlot), _>().unwrap();
        point
            .register(|_: i32| -> (i32, ErrorSlot) { panic!("must not run") }, 0)
            .unwrap();

        let outcome = point.apply(vec![Value::new("seven")], &[]);
        let error = outcome.error.unwrap();
        assert!(matches!(
            error.downcast_ref::<DynCallError>(),
            Some(DynCallError::Argument { position: 0, .. })
        ));
    }

    #[test]
    fn test_raw_filter_returning_wrong_states_halts() {
        let point = DynFilterPoint::of::<fn(i32) -> (i32, ErrorSlot), _>().unwrap();
        let signature = point.template().signature().clone();
        point
            .register_dyn(
                DynFilter::from_call(signature, |_| Outcome::next(Vec::new())),
                Registration::new(),
            )
            .unwrap();
        point
            .register(|_: i32| -> (i32, ErrorSlot) { panic!("must not run") }, 1)
            .unwrap();

        let outcome = point.apply(vec![Value::new(1_i32)], &[]);
        assert!(outcome.state.is_empty());
        assert!(matches!(
            outcome.error.unwrap().downcast_ref::<DynCallError>(),
            Some(DynCallError::StateArity {
                expected: 1,
                found: 0
            })
        ));
    }

    #[test]
    fn test_empty_point_is_identity() {
        let point = DynFilterPoint::of::<fn(i32) -> (i32, ErrorSlot), _>().unwrap();
        let outcome = point.apply(vec![Value::new(3_i32)], &[]);
        assert!(outcome.error.is_none());
        assert_eq!(ints(&outcome), [3]);
    }
}
