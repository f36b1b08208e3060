//! Type-erased states and extras.

use hookline_core::Slot;
use std::{any::Any, fmt, sync::Arc};

/// A type-erased, owned state value.
pub struct Value {
    slot: Slot,
    inner: Box<dyn Any + Send>,
}

impl Value {
    /// Erase `value`.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            slot: Slot::of::<T>(),
            inner: Box::new(value),
        }
    }

    /// The slot of the erased type.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Whether the erased type is `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.inner.is::<T>()
    }

    /// Borrow the value as `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref()
    }

    /// Take the value as `T`, or get it back unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let slot = self.slot;
        self.inner
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|inner| Self { slot, inner })
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self.slot)
    }
}

/// A type-erased extra, shared by every filter of one `apply`.
///
/// Each filter receives its own clone of the wrapped value. Wrap the value in
/// an `Arc` (with a `Mutex` or atomics inside) to share state between filters.
#[derive(Clone)]
pub struct Extra {
    slot: Slot,
    make: Arc<dyn Fn() -> Value + Send + Sync>,
}

impl Extra {
    /// Erase `value`.
    pub fn new<T: Any + Clone + Send + Sync>(value: T) -> Self {
        Self {
            slot: Slot::of::<T>(),
            make: Arc::new(move || Value::new(value.clone())),
        }
    }

    /// The slot of the erased type.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// A fresh clone of the wrapped value.
    pub fn to_value(&self) -> Value {
        (self.make)()
    }
}

impl fmt::Debug for Extra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Extra({})", self.slot)
    }
}
