//! Read-only query facade for captured traffic
//!
//! The presentation layer gets this handle instead of the store itself, so
//! the only mutation it can reach is `clear`.

use crate::models::{RecordFilter, TrafficRecord};
use crate::storage::TrafficStore;
use std::sync::Arc;

/// Listing order. Records are retained in completion order; newest-first is
/// a display choice served here rather than by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
}

/// Query handle over a shared traffic store
#[derive(Clone)]
pub struct TrafficQuery {
    store: Arc<TrafficStore>,
}

impl TrafficQuery {
    pub fn new(store: Arc<TrafficStore>) -> Self {
        Self { store }
    }

    /// All retained records as a snapshot
    pub fn list_all(&self, order: SortOrder) -> Vec<TrafficRecord> {
        let mut records = self.store.all();
        if order == SortOrder::NewestFirst {
            records.reverse();
        }
        records
    }

    /// Retained records matching the filter
    pub fn list_filtered(&self, filter: &RecordFilter, order: SortOrder) -> Vec<TrafficRecord> {
        let mut records: Vec<TrafficRecord> = self
            .store
            .all()
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        if order == SortOrder::NewestFirst {
            records.reverse();
        }
        records
    }

    /// Number of retained records
    pub fn count(&self) -> usize {
        self.store.len()
    }

    /// Drop all retained records
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Serialize the current snapshot to HAR 1.2 JSON
    pub fn export_har(&self) -> anyhow::Result<String> {
        crate::storage::export_har(&self.store.all())
    }
}
