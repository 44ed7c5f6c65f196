#[cfg(any(test, feature = "test-helpers"))]
use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

/// Source of fresh order identifiers.
pub trait OrderIdGenerator {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs in lowercase hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidOrderIdGenerator;

impl OrderIdGenerator for UuidOrderIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-N` identifiers for tests.
#[cfg(any(test, feature = "test-helpers"))]
#[derive(Debug, Default)]
pub struct SequentialOrderIdGenerator {
    prefix: String,
    next: AtomicUsize,
}

#[cfg(any(test, feature = "test-helpers"))]
impl SequentialOrderIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn issued(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl OrderIdGenerator for SequentialOrderIdGenerator {
    fn next_id(&self) -> String {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        format!("{}-{index}", self.prefix)
    }
}
