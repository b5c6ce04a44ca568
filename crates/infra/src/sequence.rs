//! PO number allocation.
//!
//! Numbers look like `PO-<year>-<seq>`, `seq` being zero-padded to four digits.
//! The in-memory allocator is best-effort: a process-wide atomic counter seeded
//! at a floor, with every candidate re-checked against the store. Two processes
//! can still race for the same number; the store's uniqueness check on save is
//! the final arbiter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use tracing::debug;

use procura_purchasing::PoNumber;

use crate::order_store::{OrderStore, OrderStoreError};

pub trait PoNumberAllocator: Send + Sync {
    /// Allocate a number not yet used by any stored order. `at` supplies the year.
    fn next(&self, at: DateTime<Utc>) -> Result<PoNumber, OrderStoreError>;
}

impl<N> PoNumberAllocator for Arc<N>
where
    N: PoNumberAllocator + ?Sized,
{
    fn next(&self, at: DateTime<Utc>) -> Result<PoNumber, OrderStoreError> {
        (**self).next(at)
    }
}

pub fn format_po_number(year: i32, seq: u64) -> PoNumber {
    PoNumber::new(format!("PO-{year}-{seq:04}"))
}

/// Atomic counter allocator backed by the store's existence check.
#[derive(Debug)]
pub struct InMemoryPoSequence<S> {
    counter: AtomicU64,
    store: S,
}

impl<S> InMemoryPoSequence<S> {
    /// The first number handed out is `floor + 1`.
    pub fn new(store: S, floor: u64) -> Self {
        Self {
            counter: AtomicU64::new(floor),
            store,
        }
    }

    /// Last sequence value handed out (or the floor).
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl<S> PoNumberAllocator for InMemoryPoSequence<S>
where
    S: OrderStore,
{
    fn next(&self, at: DateTime<Utc>) -> Result<PoNumber, OrderStoreError> {
        let year = at.year();
        loop {
            let seq = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
            let candidate = format_po_number(year, seq);
            if !self.store.exists_by_number(candidate.as_str())? {
                return Ok(candidate);
            }
            debug!(po_number = %candidate, "PO number already taken, retrying");
        }
    }
}
