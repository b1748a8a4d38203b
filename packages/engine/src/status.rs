//! Cache of the latest computed district statuses.
//!
//! Statuses are published fully formed by swapping the stored `Arc`, never
//! by mutating fields in place: a reader always sees either the previous
//! status or the complete new one. Stale entries keep being served until
//! the next recomputation cycle replaces them.

use std::sync::Arc;

use dashmap::DashMap;
use dengue_watch_analytics_models::DistrictStatus;

/// Publish-by-swap status cache keyed by canonical district name.
#[derive(Debug, Default)]
pub struct StatusCache {
    inner: DashMap<String, Arc<DistrictStatus>>,
}

impl StatusCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a fully-formed status, replacing the previous one.
    pub fn publish(&self, status: DistrictStatus) {
        self.inner
            .insert(status.district.clone(), Arc::new(status));
    }

    /// Returns the latest published status for a district.
    #[must_use]
    pub fn get(&self, district: &str) -> Option<Arc<DistrictStatus>> {
        self.inner.get(district).map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of every published status, sorted by district name.
    #[must_use]
    pub fn all(&self) -> Vec<Arc<DistrictStatus>> {
        let mut statuses: Vec<Arc<DistrictStatus>> = self
            .inner
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        statuses.sort_by(|a, b| a.district.cmp(&b.district));
        statuses
    }

    /// Number of districts with a published status.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if nothing has been published yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
