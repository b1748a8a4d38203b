//! External collaborator interfaces.
//!
//! The death-event feed and the intervention workflow are owned by other
//! parts of the platform; the core consumes them read-only behind traits so
//! tests and batch tooling can substitute in-memory implementations.

use std::collections::BTreeMap;

use dengue_watch_analytics_models::InterventionRecord;
use thiserror::Error;
use uuid::Uuid;

/// Errors reported by external feeds.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The upstream feed could not be reached or returned garbage.
    #[error("Feed unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },
}

/// Read-only view of death-linked report state per district.
pub trait DeathFeed: Send + Sync {
    /// Number of unresolved death-linked reports on record for a district.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] when the upstream feed is unavailable; the
    /// caller degrades the affected alert track rather than failing.
    fn unresolved_death_reports(&self, district: &str) -> Result<u64, FeedError>;
}

/// Read-only view of the intervention workflow's records.
pub trait InterventionSource: Send + Sync {
    /// Looks up an intervention by id.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] when the upstream source is unavailable.
    fn by_id(&self, id: Uuid) -> Result<Option<InterventionRecord>, FeedError>;
}

/// In-memory death feed keyed by canonical district name.
#[derive(Debug, Default)]
pub struct StaticDeathFeed {
    counts: BTreeMap<String, u64>,
}

impl StaticDeathFeed {
    /// Creates a feed from (district, unresolved death report count) pairs.
    #[must_use]
    pub fn new(counts: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            counts: counts.into_iter().collect(),
        }
    }
}

impl DeathFeed for StaticDeathFeed {
    fn unresolved_death_reports(&self, district: &str) -> Result<u64, FeedError> {
        Ok(self.counts.get(district).copied().unwrap_or(0))
    }
}

/// A death feed that is always down. Statuses computed against it carry
/// the sentinel `death_priority` track.
#[derive(Debug, Default)]
pub struct UnavailableDeathFeed;

impl DeathFeed for UnavailableDeathFeed {
    fn unresolved_death_reports(&self, _district: &str) -> Result<u64, FeedError> {
        Err(FeedError::Unavailable {
            message: "death-event feed is down".to_string(),
        })
    }
}

/// In-memory intervention source keyed by id.
#[derive(Debug, Default)]
pub struct StaticInterventions {
    records: BTreeMap<Uuid, InterventionRecord>,
}

impl StaticInterventions {
    /// Creates a source from a list of records.
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = InterventionRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
        }
    }
}

impl InterventionSource for StaticInterventions {
    fn by_id(&self, id: Uuid) -> Result<Option<InterventionRecord>, FeedError> {
        Ok(self.records.get(&id).cloned())
    }
}
