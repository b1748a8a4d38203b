#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Surveillance engine facade.
//!
//! Wires the core together: incoming validated reports are tagged with
//! their district (name hint first, coordinate resolution second) and
//! rolled into the weekly aggregator; a scheduled cycle reclassifies every
//! district and publishes fully-formed statuses into the cache; consumers
//! read statuses, weekly series, and intervention effectiveness through
//! typed results. Nothing here propagates an error to a UI-facing caller;
//! all failure is converted to a typed result at this boundary.

pub mod config;
pub mod feeds;
pub mod scheduler;
pub mod status;

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use dengue_watch_aggregate::WeeklyAggregator;
use dengue_watch_analytics_models::{DistrictStatus, EffectivenessOutcome, WeeklySeries};
use dengue_watch_boundary::{BoundaryError, BoundaryStore};
use dengue_watch_report_models::{IncomingReport, ValidationStatus};
use dengue_watch_resolver::DistrictIndex;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub use config::AnalysisConfig;
pub use feeds::{DeathFeed, FeedError, InterventionSource};
pub use status::StatusCache;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Boundary data failed to load.
    #[error("Boundary error: {0}")]
    Boundary(#[from] BoundaryError),

    /// A configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// An external feed failed outside a degradable path.
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// No intervention with the given id exists.
    #[error("Unknown intervention {id}")]
    UnknownIntervention {
        /// The id that was looked up.
        id: Uuid,
    },
}

/// Counters from one batch of ingested reports.
#[derive(Debug, Default, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    /// Reports attributed to a district and counted.
    pub ingested: usize,
    /// Reports dropped because they were not validated.
    pub not_validated: usize,
    /// Validated reports outside every known district.
    pub unresolved: usize,
}

/// The assembled surveillance core.
///
/// Cheap to clone: all state is behind `Arc`s, so per-district recompute
/// tasks and the scheduler share the same aggregator and cache.
#[derive(Clone)]
pub struct SurveillanceEngine {
    store: Arc<BoundaryStore>,
    index: Arc<DistrictIndex>,
    aggregator: Arc<WeeklyAggregator>,
    cache: Arc<StatusCache>,
    config: Arc<AnalysisConfig>,
    death_feed: Arc<dyn DeathFeed>,
    interventions: Arc<dyn InterventionSource>,
}

impl SurveillanceEngine {
    /// Assembles an engine over an immutable boundary snapshot.
    #[must_use]
    pub fn new(
        store: Arc<BoundaryStore>,
        config: AnalysisConfig,
        death_feed: Arc<dyn DeathFeed>,
        interventions: Arc<dyn InterventionSource>,
    ) -> Self {
        let index = Arc::new(DistrictIndex::build(&store));
        Self {
            store,
            index,
            aggregator: Arc::new(WeeklyAggregator::new()),
            cache: Arc::new(StatusCache::new()),
            config: Arc::new(config),
            death_feed,
            interventions,
        }
    }

    /// Resolves a coordinate to the owning district name.
    ///
    /// `None` is the normal outcome for points outside the service area.
    #[must_use]
    pub fn resolve_district(&self, lon: f64, lat: f64) -> Option<&str> {
        self.index.resolve(lon, lat)
    }

    /// Ingests one validated report, returning the canonical district it
    /// was attributed to.
    ///
    /// The submitter's district hint wins when it matches a known boundary
    /// by normalized name; otherwise the coordinate decides. Non-validated
    /// reports and reports outside coverage are dropped with a log line;
    /// data errors never crash ingestion.
    pub fn ingest_report(&self, report: &IncomingReport) -> Option<String> {
        if report.status != ValidationStatus::Validated {
            log::debug!("Dropping non-validated report {}", report.id);
            return None;
        }

        let district = report
            .district_hint
            .as_deref()
            .and_then(|hint| self.store.lookup(hint))
            .map(|boundary| boundary.name.clone())
            .or_else(|| {
                self.index
                    .resolve(report.coordinate.lon, report.coordinate.lat)
                    .map(str::to_string)
            });

        match district {
            Some(name) => {
                self.aggregator.ingest(&name, report.occurred_at);
                Some(name)
            }
            None => {
                log::debug!(
                    "Report {} at ({}, {}) is outside every known district",
                    report.id,
                    report.coordinate.lon,
                    report.coordinate.lat
                );
                None
            }
        }
    }

    /// Ingests a batch of reports.
    pub fn ingest_batch<'a>(
        &self,
        reports: impl IntoIterator<Item = &'a IncomingReport>,
    ) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for report in reports {
            if report.status != ValidationStatus::Validated {
                summary.not_validated += 1;
            } else if self.ingest_report(report).is_some() {
                summary.ingested += 1;
            } else {
                summary.unresolved += 1;
            }
        }
        log::info!(
            "Ingested {} reports ({} not validated, {} unresolved)",
            summary.ingested,
            summary.not_validated,
            summary.unresolved
        );
        summary
    }

    /// Returns the latest published status for a district, matched by
    /// normalized name.
    #[must_use]
    pub fn district_status(&self, district: &str) -> Option<Arc<DistrictStatus>> {
        self.cache.get(self.canonical_name(district))
    }

    /// Snapshot of every published district status.
    #[must_use]
    pub fn all_statuses(&self) -> Vec<Arc<DistrictStatus>> {
        self.cache.all()
    }

    /// Returns a district's weekly series as of today (UTC).
    #[must_use]
    pub fn weekly_series(&self, district: &str, weeks: u32) -> WeeklySeries {
        self.weekly_series_as_of(district, weeks, Utc::now().date_naive())
    }

    /// Returns a district's weekly series as of an explicit date.
    #[must_use]
    pub fn weekly_series_as_of(&self, district: &str, weeks: u32, as_of: NaiveDate) -> WeeklySeries {
        self.aggregator
            .series_for(self.canonical_name(district), weeks, as_of)
    }

    /// Analyzes an intervention's effectiveness as of today (UTC).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the intervention source is unavailable
    /// or the id is unknown. Premature analysis is not an error; it is
    /// the explicit not-yet-eligible outcome.
    pub fn effectiveness(&self, id: Uuid) -> Result<EffectivenessOutcome, EngineError> {
        self.effectiveness_as_of(id, Utc::now().date_naive())
    }

    /// Analyzes an intervention's effectiveness as of an explicit date.
    ///
    /// # Errors
    ///
    /// See [`Self::effectiveness`].
    pub fn effectiveness_as_of(
        &self,
        id: Uuid,
        today: NaiveDate,
    ) -> Result<EffectivenessOutcome, EngineError> {
        let record = self
            .interventions
            .by_id(id)?
            .ok_or(EngineError::UnknownIntervention { id })?;

        Ok(dengue_watch_intervention::analyze(
            &record,
            &self.aggregator,
            &self.config.intervention,
            today,
        ))
    }

    /// Computes one district's status from the current aggregates.
    ///
    /// Pure over the aggregator snapshot: identical input series yield an
    /// identical status. A failing death feed degrades that track to the
    /// sentinel instead of failing the computation.
    #[must_use]
    pub fn compute_district(
        &self,
        district: &str,
        as_of: NaiveDate,
        now: DateTime<Utc>,
    ) -> DistrictStatus {
        let series =
            self.aggregator
                .series_for(district, self.config.analysis.series_weeks, as_of);
        let pattern =
            dengue_watch_classify::classify(&series.completed_counts(), &self.config.classifier);

        let volume =
            self.aggregator
                .recent_volume(district, self.config.volume.recent_weeks, as_of);

        let death_reports = match self.death_feed.unresolved_death_reports(district) {
            Ok(count) => Some(count),
            Err(e) => {
                log::warn!("Death feed unavailable for {district}: {e}");
                None
            }
        };

        dengue_watch_alert::synthesize(
            district,
            pattern,
            volume,
            death_reports,
            &self.config.volume,
            now,
        )
    }

    /// Recomputes and publishes every district's status, parallel
    /// per-district since districts are independent.
    ///
    /// Returns the number of statuses published.
    pub async fn recompute_all(&self, as_of: NaiveDate) -> usize {
        let now = Utc::now();

        // Every district with a boundary gets a status, plus any district
        // that has ingested reports (normally a subset of the former).
        let mut districts: BTreeSet<String> =
            self.store.iter().map(|b| b.name.clone()).collect();
        districts.extend(self.aggregator.districts());

        let tasks: Vec<_> = districts
            .into_iter()
            .map(|district| {
                let engine = self.clone();
                tokio::spawn(async move {
                    let status = engine.compute_district(&district, as_of, now);
                    engine.cache.publish(status);
                })
            })
            .collect();

        let mut published = 0;
        for result in futures::future::join_all(tasks).await {
            match result {
                Ok(()) => published += 1,
                Err(e) => log::error!("District recompute task failed: {e}"),
            }
        }
        published
    }

    /// Maps any spelling of a district name to the boundary file's
    /// canonical one; unknown names pass through unchanged.
    fn canonical_name<'a>(&'a self, district: &'a str) -> &'a str {
        self.store
            .lookup(district)
            .map_or(district, |boundary| boundary.name.as_str())
    }
}
