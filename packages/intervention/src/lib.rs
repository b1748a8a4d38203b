#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Before/after effectiveness comparison for completed interventions.
//!
//! Compares total validated-report counts in equal-length windows
//! immediately before and after an intervention date, once a maturation
//! period has elapsed. Premature comparison is actively rejected, since effects
//! have not had time to manifest, and surfaces as an explicit
//! not-yet-eligible result rather than a number.
//!
//! This is a simple differencing estimator, not a causal model: it does not
//! control for seasonality or concurrent interventions. Known limitation.

use chrono::{Duration, NaiveDate};
use dengue_watch_aggregate::{WeeklyAggregator, week_start};
use dengue_watch_analytics_models::{
    EffectivenessOutcome, EffectivenessReport, InterventionRecord,
};
use serde::{Deserialize, Serialize};

/// Effectiveness analysis thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct InterventionConfig {
    /// Days that must elapse after the intervention date before the
    /// comparison is meaningful.
    pub maturation_days: i64,
    /// Length of each comparison window, in calendar weeks.
    pub window_weeks: u32,
}

impl Default for InterventionConfig {
    fn default() -> Self {
        Self {
            maturation_days: 120,
            window_weeks: 8,
        }
    }
}

/// Returns `true` for the external workflow's completion statuses.
fn is_completed(status: &str) -> bool {
    matches!(
        status.trim().to_ascii_lowercase().as_str(),
        "completed" | "complete"
    )
}

/// Analyzes one intervention against the aggregated weekly series.
///
/// Both windows pivot on the Monday of the intervention week, so each
/// covers exactly `window_weeks` calendar weeks; the week containing the
/// intervention date itself counts as "after".
#[must_use]
pub fn analyze(
    record: &InterventionRecord,
    aggregator: &WeeklyAggregator,
    config: &InterventionConfig,
    today: NaiveDate,
) -> EffectivenessOutcome {
    if !is_completed(&record.status) {
        return EffectivenessOutcome::not_yet_eligible(format!(
            "intervention status is '{}', not completed",
            record.status
        ));
    }

    let elapsed = (today - record.date).num_days();
    if elapsed < config.maturation_days {
        return EffectivenessOutcome::not_yet_eligible(format!(
            "only {elapsed} of {} maturation days have elapsed",
            config.maturation_days
        ));
    }

    let window = Duration::weeks(i64::from(config.window_weeks));
    let pivot = week_start(record.date);
    let total_before = aggregator.total_between(&record.district, pivot - window, pivot);
    let total_after = aggregator.total_between(&record.district, pivot, pivot + window);

    #[allow(clippy::cast_precision_loss)]
    let percent_change =
        (total_after as f64 - total_before as f64) / total_before.max(1) as f64 * 100.0;

    log::debug!(
        "Intervention {} in {}: {total_before} before, {total_after} after",
        record.id,
        record.district
    );

    EffectivenessOutcome::Evaluated(EffectivenessReport {
        total_before,
        total_after,
        percent_change,
    })
}
