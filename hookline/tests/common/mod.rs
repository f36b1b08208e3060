#![allow(dead_code)]

use hookline::{Filter, Outcome};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denied(pub &'static str);

impl std::fmt::Display for Denied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "denied: {}", self.0)
    }
}

impl std::error::Error for Denied {}

// ============================================================================
// Test Filters
// ============================================================================

/// Adds one to the state and remembers its id in `order`.
pub struct Increment {
    pub id: char,
    pub order: Arc<parking_lot::Mutex<Vec<char>>>,
}

impl Filter<i32, (), Denied> for Increment {
    fn filter(&self, state: i32, _extra: &()) -> Outcome<i32, Denied> {
        self.order.lock().push(self.id);
        Outcome::next(state + 1)
    }
}

/// Adds one to the state and halts the chain.
pub struct IncrementAndDeny {
    pub calls: Arc<AtomicUsize>,
}

impl Filter<i32, (), Denied> for IncrementAndDeny {
    fn filter(&self, state: i32, _extra: &()) -> Outcome<i32, Denied> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Outcome::halt(state + 1, Denied("increment"))
    }
}

pub fn order_log() -> Arc<parking_lot::Mutex<Vec<char>>> {
    Arc::new(parking_lot::Mutex::new(Vec::new()))
}
