//! # Signature Validation
//!
//! Runtime description of filter shapes, for filter points whose types are
//! only known when filters are registered.
//!
//! A filter of shape
//! `fn(T1..Tn, A1..Am) -> (T1..Tn, error)` threads the `T`s through the chain
//! and receives the `A`s (extras) unchanged. A [`Template`] fixes `n`, `m` and
//! every [`Slot`]; candidates are checked against it with
//! [`Template::check`].
//!
//! # Rules
//!
//! 1. The shape must be callable.
//! 2. The results must end with exactly one error slot ([`ErrorSlot`]).
//! 3. For `k = min(#params, #results - 1)`, parameter `i` and result `i` are
//!    the same type for every `i < k`.
//! 4. There are exactly `k + 1` results.
//! 5. Parameters past `k` are extras; a candidate's extras must equal the
//!    template's.

use crate::error::{BoxError, ConfigurationError};
use std::{
    any::{Any, TypeId},
    fmt,
    hash::{Hash, Hasher},
};

/// The type occupying the trailing error slot of every filter shape.
pub type ErrorSlot = Option<BoxError>;

/// A runtime type descriptor for one parameter or result position.
///
/// Slots compare by [`TypeId`]; the name is only used for messages.
#[derive(Clone, Copy)]
pub struct Slot {
    id: TypeId,
    name: &'static str,
}

impl Slot {
    /// The slot of type `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The error slot.
    pub fn error() -> Self {
        Self::of::<ErrorSlot>()
    }

    /// Whether this is the error slot.
    pub fn is_error(&self) -> bool {
        self.id == TypeId::of::<ErrorSlot>()
    }

    /// The [`TypeId`] of the slot's type.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// The slot's type name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Slot {}

impl Hash for Slot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot({self})")
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error() {
            f.write_str("error")
        } else {
            f.write_str(self.name)
        }
    }
}

/// Parameter and result slots of a callable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    params: Vec<Slot>,
    results: Vec<Slot>,
}

impl Signature {
    /// Create a signature from parameter and result slots.
    pub fn new(params: impl Into<Vec<Slot>>, results: impl Into<Vec<Slot>>) -> Self {
        Self {
            params: params.into(),
            results: results.into(),
        }
    }

    /// Append a parameter of type `T`.
    pub fn param<T: Any + ?Sized>(mut self) -> Self {
        self.params.push(Slot::of::<T>());
        self
    }

    /// Append a result of type `T`.
    pub fn result<T: Any + ?Sized>(mut self) -> Self {
        self.results.push(Slot::of::<T>());
        self
    }

    /// Append the error result.
    pub fn error(mut self) -> Self {
        self.results.push(Slot::error());
        self
    }

    /// Parameter slots.
    pub fn params(&self) -> &[Slot] {
        &self.params
    }

    /// Result slots.
    pub fn results(&self) -> &[Slot] {
        &self.results
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_list(f, &self.params)?;
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [single] => write!(f, " -> {single}"),
            many => {
                f.write_str(" -> (")?;
                write_list(f, many)?;
                f.write_str(")")
            }
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, slots: &[Slot]) -> fmt::Result {
    for (i, slot) in slots.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{slot}")?;
    }
    Ok(())
}

/// A candidate shape: either a callable or a plain value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// A callable with the given signature.
    Callable(Signature),
    /// A non-callable value.
    Value(Slot),
}

impl Shape {
    /// The shape of a plain value of type `T`.
    pub fn value<T: Any + ?Sized>() -> Self {
        Shape::Value(Slot::of::<T>())
    }
}

impl From<Signature> for Shape {
    fn from(signature: Signature) -> Self {
        Shape::Callable(signature)
    }
}

/// The validated shape a filter point expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    signature: Signature,
    states: usize,
}

impl Template {
    /// Validate `shape` as a filter shape.
    ///
    /// Fails with [`ConfigurationError`] if the shape is not callable, lacks
    /// the trailing error slot, or its leading parameters and results differ.
    pub fn new(shape: impl Into<Shape>) -> Result<Self, ConfigurationError> {
        let signature = match shape.into() {
            Shape::Callable(signature) => signature,
            Shape::Value(found) => return Err(ConfigurationError::NotCallable { found }),
        };
        let states = state_arity(&signature)?;
        Ok(Self { signature, states })
    }

    /// Check that `candidate` can be registered at a point with this template.
    pub fn check(&self, candidate: &Shape) -> Result<(), ConfigurationError> {
        let candidate = Template::new(candidate.clone())?;

        if candidate.state_slots() != self.state_slots() {
            return Err(ConfigurationError::StateShapeMismatch {
                template: self.signature.clone(),
                candidate: candidate.signature,
            });
        }
        if candidate.extra_slots() != self.extra_slots() {
            return Err(ConfigurationError::ExtraMismatch {
                template: self.signature.clone(),
                candidate: candidate.signature,
            });
        }
        Ok(())
    }

    /// The template's signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Slots of the threaded state, in order.
    pub fn state_slots(&self) -> &[Slot] {
        &self.signature.results[..self.states]
    }

    /// Slots of the extras, in order.
    pub fn extra_slots(&self) -> &[Slot] {
        &self.signature.params[self.states..]
    }

    /// Number of threaded state values.
    pub fn state_arity(&self) -> usize {
        self.states
    }

    /// Number of extras.
    pub fn extra_arity(&self) -> usize {
        self.signature.params.len() - self.states
    }
}

impl TryFrom<Signature> for Template {
    type Error = ConfigurationError;

    fn try_from(signature: Signature) -> Result<Self, Self::Error> {
        Template::new(signature)
    }
}

/// Returns the number of threaded state values of a well-formed signature.
fn state_arity(signature: &Signature) -> Result<usize, ConfigurationError> {
    let params = signature.params();
    let results = signature.results();

    if !results.last().is_some_and(Slot::is_error) {
        return Err(ConfigurationError::MissingErrorSlot {
            signature: signature.clone(),
        });
    }

    let k = params.len().min(results.len() - 1);
    if let Some(position) = (0..k).find(|&i| params[i] != results[i]) {
        return Err(ConfigurationError::StateMismatch {
            signature: signature.clone(),
            position,
            param: params[position],
            result: results[position],
        });
    }

    if results.len() != k + 1 {
        return Err(ConfigurationError::ResultArity {
            signature: signature.clone(),
            expected: k + 1,
            found: results.len(),
        });
    }

    Ok(k)
}
