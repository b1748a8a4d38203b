#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Weekly series, trend pattern, alert, and effectiveness result types.
//!
//! These are the shapes the analysis core hands to consumers: dashboards
//! and notification workers treat them as opaque JSON. Alert tracks are
//! always fully populated: "nothing to report" is the literal `"None"`
//! sentinel rather than an omitted field, so consumers can hide empty
//! sections without probing for missing keys.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Sentinel value carried by alert track fields with nothing to report.
pub const NONE_SENTINEL: &str = "None";

/// Trend label assigned to a district's weekly series.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrendPattern {
    /// Latest completed week far exceeds the preceding weeks
    Spike,
    /// Sustained week-over-week growth
    GradualRise,
    /// Sustained week-over-week decrease
    Decline,
    /// Counts holding within a narrow band
    Stability,
    /// Insufficient data, or no pattern matched
    None,
}

/// Overall district risk level, ordered from least to most severe.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    /// No usable signal for this district yet
    Unknown,
    /// Routine surveillance level
    Low,
    /// Elevated, needs monitoring
    Medium,
    /// Requires intervention
    High,
}

/// One calendar-week count bucket.
///
/// Weeks run Monday through Sunday in UTC, anchored identically for every
/// district, so buckets align across the whole service area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyBucket {
    /// Monday of the week (inclusive).
    pub week_start: NaiveDate,
    /// Sunday of the week (inclusive).
    pub week_end: NaiveDate,
    /// Validated report count attributed to this week.
    pub count: u64,
}

/// A district's recent weekly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySeries {
    /// Canonical district name.
    pub district: String,
    /// The most recent completed weeks, oldest first, zero-filled.
    pub complete_weeks: Vec<WeeklyBucket>,
    /// The partial bucket for the week containing "now"; excluded from
    /// completed-week statistics.
    pub current_week: WeeklyBucket,
}

impl WeeklySeries {
    /// Completed-week counts, oldest first, as classifier input.
    #[must_use]
    pub fn completed_counts(&self) -> Vec<u64> {
        self.complete_weeks.iter().map(|b| b.count).collect()
    }
}

/// One alert track: a status line, a human-readable alert, and a
/// recommended response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertTrack {
    /// Short operational status (e.g. "Immediate Action Required").
    pub status: String,
    /// Human-readable alert message.
    pub alert: String,
    /// Recommended response for district health workers.
    pub recommendation: String,
}

impl AlertTrack {
    /// Creates a populated track.
    #[must_use]
    pub fn new(
        status: impl Into<String>,
        alert: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            status: status.into(),
            alert: alert.into(),
            recommendation: recommendation.into(),
        }
    }

    /// The sentinel track: nothing to report on this signal.
    #[must_use]
    pub fn none() -> Self {
        Self::new(NONE_SENTINEL, NONE_SENTINEL, NONE_SENTINEL)
    }

    /// Returns `true` if this is the sentinel track.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.status == NONE_SENTINEL
    }
}

/// Derived per-district status, recomputed on a schedule and replaced
/// wholesale on every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictStatus {
    /// Canonical district name.
    pub district: String,
    /// Trend label from the pattern classifier.
    pub pattern: TrendPattern,
    /// Alert derived from the trend label.
    pub pattern_based: AlertTrack,
    /// Alert derived from raw report volume, independent of trend shape.
    pub report_based: AlertTrack,
    /// Alert derived from unresolved death-linked reports.
    pub death_priority: AlertTrack,
    /// Maximum severity across the three tracks.
    pub risk_level: RiskLevel,
    /// When this status was computed (UTC).
    pub last_analysis_time: DateTime<Utc>,
}

/// An intervention as recorded by the external intervention workflow.
///
/// Read-only input to the effectiveness analyzer. `kind` and `status` are
/// free-form strings owned by that workflow; the analyzer only inspects
/// `status` (case-insensitively) for completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionRecord {
    /// Unique intervention identifier.
    pub id: Uuid,
    /// District the intervention targeted.
    pub district: String,
    /// Intervention type (e.g. "fogging", "larviciding", "clean-up drive").
    #[serde(rename = "type")]
    pub kind: String,
    /// Date the intervention was carried out.
    pub date: NaiveDate,
    /// Workflow status; "completed"/"complete" marks eligibility.
    pub status: String,
}

/// Result of an intervention effectiveness analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EffectivenessOutcome {
    /// The before/after comparison for a matured, completed intervention.
    Evaluated(EffectivenessReport),
    /// The intervention is not yet eligible for comparison.
    NotYetEligible(NotYetEligible),
}

impl EffectivenessOutcome {
    /// Builds the not-eligible outcome with an operator-facing reason.
    #[must_use]
    pub fn not_yet_eligible(reason: impl Into<String>) -> Self {
        Self::NotYetEligible(NotYetEligible {
            eligible: false,
            reason: reason.into(),
        })
    }
}

/// Before/after comparison of completed-week report totals around an
/// intervention date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectivenessReport {
    /// Total reports in the window before the intervention.
    pub total_before: u64,
    /// Total reports in the equal-length window after it.
    pub total_after: u64,
    /// Percent change from before to after.
    pub percent_change: f64,
}

/// Explicit "not yet eligible" result; premature comparison is rejected
/// because effects have not had time to manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotYetEligible {
    /// Always `false`; consumers key off this field.
    pub eligible: bool,
    /// Why the intervention cannot be evaluated yet.
    pub reason: String,
}
