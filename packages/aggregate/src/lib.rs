#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Weekly report aggregation into calendar-week buckets per district.
//!
//! Rolls validated report events into Monday-anchored UTC calendar weeks.
//! The map is sharded by district: ingestion for different districts never
//! contends, while increments for the same district are serialized by the
//! shard entry guard, so concurrent ingestion cannot lose updates. Buckets
//! are append/increment-only and never deleted.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use dashmap::DashMap;
use dengue_watch_analytics_models::{WeeklyBucket, WeeklySeries};

/// Returns the Monday of the calendar week containing `date`.
///
/// All bucketing goes through this single anchor so every district shares
/// week alignment.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

/// Builds the bucket covering the week that starts at `start`.
#[must_use]
pub fn bucket_for(start: NaiveDate, count: u64) -> WeeklyBucket {
    WeeklyBucket {
        week_start: start,
        week_end: start + Duration::days(6),
        count,
    }
}

/// Rolling per-district weekly counts.
///
/// The only mutable shared structure in the core; everything downstream
/// reads immutable snapshots derived from it.
#[derive(Debug, Default)]
pub struct WeeklyAggregator {
    districts: DashMap<String, BTreeMap<NaiveDate, u64>>,
}

impl WeeklyAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes one validated report to its district's weekly bucket,
    /// creating the bucket if absent.
    pub fn ingest(&self, district: &str, occurred_at: DateTime<Utc>) {
        let start = week_start(occurred_at.date_naive());
        let mut weeks = self.districts.entry(district.to_string()).or_default();
        *weeks.entry(start).or_insert(0) += 1;
    }

    /// Returns the most recent `weeks` completed weeks (oldest first,
    /// zero-filled; the classifier requires a contiguous series) plus the
    /// current partial week.
    ///
    /// A district with no events yields an all-zero series, not an error.
    #[must_use]
    pub fn series_for(&self, district: &str, weeks: u32, as_of: NaiveDate) -> WeeklySeries {
        let current_start = week_start(as_of);
        let counts = self.districts.get(district);
        let count_at = |start: NaiveDate| {
            counts
                .as_ref()
                .and_then(|weeks| weeks.get(&start).copied())
                .unwrap_or(0)
        };

        let mut complete_weeks = Vec::new();
        for offset in (1..=i64::from(weeks)).rev() {
            let start = current_start - Duration::weeks(offset);
            complete_weeks.push(bucket_for(start, count_at(start)));
        }

        WeeklySeries {
            district: district.to_string(),
            complete_weeks,
            current_week: bucket_for(current_start, count_at(current_start)),
        }
    }

    /// Sums bucket counts for weeks whose start date falls in `[from, to)`.
    #[must_use]
    pub fn total_between(&self, district: &str, from: NaiveDate, to: NaiveDate) -> u64 {
        self.districts
            .get(district)
            .map_or(0, |weeks| weeks.range(from..to).map(|(_, count)| count).sum())
    }

    /// Raw recent report volume: the last `weeks` completed weeks plus the
    /// current partial week. The partial week is included so a burst of
    /// fresh reports raises the volume signal before the week closes.
    #[must_use]
    pub fn recent_volume(&self, district: &str, weeks: u32, as_of: NaiveDate) -> u64 {
        let current_start = week_start(as_of);
        let from = current_start - Duration::weeks(i64::from(weeks));
        self.total_between(district, from, current_start + Duration::weeks(1))
    }

    /// Snapshot of known district keys, sorted for deterministic batch
    /// recomputation order.
    #[must_use]
    pub fn districts(&self) -> Vec<String> {
        let mut names: Vec<String> = self.districts.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of districts with at least one ingested report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.districts.len()
    }

    /// Returns `true` if nothing has been ingested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn weeks_anchor_on_monday() {
        // 2026-07-06 is a Monday.
        assert_eq!(week_start(date(2026, 7, 6)), date(2026, 7, 6));
        assert_eq!(week_start(date(2026, 7, 8)), date(2026, 7, 6));
        assert_eq!(week_start(date(2026, 7, 12)), date(2026, 7, 6));
        assert_eq!(week_start(date(2026, 7, 13)), date(2026, 7, 13));
    }

    #[test]
    fn same_week_events_share_a_bucket() {
        let aggregator = WeeklyAggregator::new();
        aggregator.ingest("Commonwealth", at(2026, 7, 6));
        aggregator.ingest("Commonwealth", at(2026, 7, 9));
        aggregator.ingest("Commonwealth", at(2026, 7, 12));

        let series = aggregator.series_for("Commonwealth", 1, date(2026, 7, 15));
        assert_eq!(series.complete_weeks.len(), 1);
        assert_eq!(series.complete_weeks[0].week_start, date(2026, 7, 6));
        assert_eq!(series.complete_weeks[0].week_end, date(2026, 7, 12));
        assert_eq!(series.complete_weeks[0].count, 3);
    }

    #[test]
    fn series_zero_fills_gap_weeks() {
        let aggregator = WeeklyAggregator::new();
        aggregator.ingest("Commonwealth", at(2026, 6, 15));
        aggregator.ingest("Commonwealth", at(2026, 7, 6));

        let series = aggregator.series_for("Commonwealth", 4, date(2026, 7, 15));
        let counts = series.completed_counts();
        assert_eq!(counts, vec![1, 0, 0, 1]);
    }

    #[test]
    fn unknown_district_yields_zero_series() {
        let aggregator = WeeklyAggregator::new();
        let series = aggregator.series_for("Nowhere", 4, date(2026, 7, 15));

        assert_eq!(series.completed_counts(), vec![0, 0, 0, 0]);
        assert_eq!(series.current_week.count, 0);
    }

    #[test]
    fn current_week_is_excluded_from_completed() {
        let aggregator = WeeklyAggregator::new();
        // as_of Wednesday 2026-07-15; its week started Monday 2026-07-13.
        aggregator.ingest("Commonwealth", at(2026, 7, 14));

        let series = aggregator.series_for("Commonwealth", 2, date(2026, 7, 15));
        assert_eq!(series.completed_counts(), vec![0, 0]);
        assert_eq!(series.current_week.week_start, date(2026, 7, 13));
        assert_eq!(series.current_week.count, 1);
    }

    #[test]
    fn total_between_is_half_open_over_week_starts() {
        let aggregator = WeeklyAggregator::new();
        aggregator.ingest("Commonwealth", at(2026, 6, 29));
        aggregator.ingest("Commonwealth", at(2026, 7, 6));
        aggregator.ingest("Commonwealth", at(2026, 7, 13));

        let total = aggregator.total_between("Commonwealth", date(2026, 6, 29), date(2026, 7, 13));
        assert_eq!(total, 2);
    }

    #[test]
    fn recent_volume_includes_the_current_partial_week() {
        let aggregator = WeeklyAggregator::new();
        aggregator.ingest("Commonwealth", at(2026, 7, 1));
        aggregator.ingest("Commonwealth", at(2026, 7, 8));
        aggregator.ingest("Commonwealth", at(2026, 7, 14));

        assert_eq!(aggregator.recent_volume("Commonwealth", 2, date(2026, 7, 15)), 3);
    }

    #[test]
    fn concurrent_same_key_increments_are_not_lost() {
        let aggregator = std::sync::Arc::new(WeeklyAggregator::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let aggregator = std::sync::Arc::clone(&aggregator);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        aggregator.ingest("Commonwealth", at(2026, 7, 8));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let series = aggregator.series_for("Commonwealth", 1, date(2026, 7, 15));
        assert_eq!(series.complete_weeks[0].count, 800);
    }

    #[test]
    fn districts_snapshot_is_sorted() {
        let aggregator = WeeklyAggregator::new();
        aggregator.ingest("Payatas", at(2026, 7, 8));
        aggregator.ingest("Commonwealth", at(2026, 7, 8));

        assert_eq!(aggregator.districts(), vec!["Commonwealth", "Payatas"]);
    }
}
