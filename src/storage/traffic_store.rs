//! Bounded in-memory retention of traffic records

use crate::models::TrafficRecord;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Default retention when none is configured
pub const DEFAULT_CAPACITY: usize = 100;

/// Fixed-capacity, insertion-ordered ring of completed traffic records.
///
/// Insertion order is completion order: two requests issued A-then-B that
/// complete B-then-A are retained as B-then-A. Eviction is strict FIFO.
///
/// All mutation happens under one mutex section, so the capacity check and
/// the eviction it may trigger are atomic; concurrent appends cannot push
/// the ring past capacity or lose entries. The store is meant to be built
/// once at the composition root and shared via `Arc` between the recorder
/// and the query facade.
pub struct TrafficStore {
    ring: Mutex<VecDeque<TrafficRecord>>,
    capacity: usize,
}

impl TrafficStore {
    /// Create a store retaining at most `capacity` records (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Append one completed record, evicting the oldest first when full.
    /// O(1) amortized.
    pub fn append(&self, record: TrafficRecord) {
        let mut ring = self.ring.lock().expect("traffic ring mutex poisoned");
        while ring.len() >= self.capacity {
            ring.pop_front();
        }
        ring.push_back(record);
    }

    /// Snapshot of all retained records in completion order. The live ring
    /// is never exposed, so readers cannot observe a torn state.
    pub fn all(&self) -> Vec<TrafficRecord> {
        let ring = self.ring.lock().expect("traffic ring mutex poisoned");
        ring.iter().cloned().collect()
    }

    /// Drop every retained record. Identifiers of later appends remain
    /// unique; nothing is reset beyond the ring itself.
    pub fn clear(&self) {
        let mut ring = self.ring.lock().expect("traffic ring mutex poisoned");
        let dropped = ring.len();
        ring.clear();
        tracing::info!(dropped, "traffic store cleared");
    }

    pub fn len(&self) -> usize {
        self.ring.lock().expect("traffic ring mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
