#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Alert track synthesis and district risk leveling.
//!
//! Combines three independent signals (the trend label, raw recent report
//! volume, and unresolved death-linked reports) into three parallel alert
//! tracks. The tracks answer different operational questions and are
//! surfaced separately in the UI; a district whose trend is "stable" can
//! still carry a volume alert, and a single unresolved death forces the
//! overall risk to high regardless of the other two signals.
//!
//! Synthesis always produces a full status: an unavailable upstream signal
//! degrades its own track to the `"None"` sentinel and never fails the
//! computation.

use chrono::{DateTime, Utc};
use dengue_watch_analytics_models::{AlertTrack, DistrictStatus, RiskLevel, TrendPattern};
use serde::{Deserialize, Serialize};

/// Report-volume alert thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct VolumeThresholds {
    /// Completed weeks (plus the current partial week) summed into the
    /// recent-volume signal.
    pub recent_weeks: u32,
    /// Volume at or above this is an elevated-volume alert.
    pub medium_threshold: u64,
    /// Volume at or above this is a high-volume alert.
    pub high_threshold: u64,
}

impl Default for VolumeThresholds {
    fn default() -> Self {
        Self {
            recent_weeks: 2,
            medium_threshold: 10,
            high_threshold: 25,
        }
    }
}

/// Synthesizes a district's full status from its three raw signals.
///
/// `death_reports` is `None` when the death-event feed is unavailable; the
/// track degrades to the sentinel and contributes nothing to the risk
/// level.
#[must_use]
pub fn synthesize(
    district: &str,
    pattern: TrendPattern,
    recent_volume: u64,
    death_reports: Option<u64>,
    thresholds: &VolumeThresholds,
    now: DateTime<Utc>,
) -> DistrictStatus {
    let pattern_based = pattern_track(pattern, district);
    let report_based = volume_track(recent_volume, thresholds);
    let death_priority = death_track(death_reports);

    let risk_level = pattern_risk(pattern)
        .max(volume_risk(recent_volume, thresholds))
        .max(death_risk(death_reports));

    DistrictStatus {
        district: district.to_string(),
        pattern,
        pattern_based,
        report_based,
        death_priority,
        risk_level,
        last_analysis_time: now,
    }
}

/// Fixed message/recommendation template per trend label.
fn pattern_track(pattern: TrendPattern, district: &str) -> AlertTrack {
    match pattern {
        TrendPattern::Spike => AlertTrack::new(
            "Immediate Action Required",
            format!("Sharp increase in dengue reports in {district} over the last week"),
            "Coordinate immediate fogging operations, deploy larval traps, and mobilize \
             barangay health workers for house-to-house inspections.",
        ),
        TrendPattern::GradualRise => AlertTrack::new(
            "Heightened Monitoring",
            format!("Dengue reports in {district} have been rising for several consecutive weeks"),
            "Schedule larviciding and community clean-up drives targeting stagnant water sites.",
        ),
        TrendPattern::Decline => AlertTrack::new(
            "Improving",
            format!("Dengue reports in {district} are on a sustained decline"),
            "Maintain current control measures and continue breeding-site surveillance.",
        ),
        TrendPattern::Stability => AlertTrack::new(
            "Under Control",
            format!("Report volume in {district} is holding steady week over week"),
            "Continue routine surveillance and community education.",
        ),
        TrendPattern::None => AlertTrack::none(),
    }
}

fn volume_track(recent_volume: u64, thresholds: &VolumeThresholds) -> AlertTrack {
    if recent_volume >= thresholds.high_threshold {
        AlertTrack::new(
            "High Report Volume",
            format!("{recent_volume} reports received in recent weeks"),
            "Prioritize field validation of pending reports and expand inspection coverage.",
        )
    } else if recent_volume >= thresholds.medium_threshold {
        AlertTrack::new(
            "Elevated Report Volume",
            format!("{recent_volume} reports received in recent weeks"),
            "Review pending reports and schedule additional field validation.",
        )
    } else {
        AlertTrack::none()
    }
}

fn death_track(death_reports: Option<u64>) -> AlertTrack {
    match death_reports {
        Some(count) if count > 0 => AlertTrack::new(
            "Death Case Priority",
            format!("{count} unresolved death-linked report(s) on record"),
            "Escalate to the city epidemiology unit for immediate case investigation.",
        ),
        _ => AlertTrack::none(),
    }
}

const fn pattern_risk(pattern: TrendPattern) -> RiskLevel {
    match pattern {
        TrendPattern::Spike => RiskLevel::High,
        TrendPattern::GradualRise => RiskLevel::Medium,
        TrendPattern::Decline | TrendPattern::Stability => RiskLevel::Low,
        TrendPattern::None => RiskLevel::Unknown,
    }
}

fn volume_risk(recent_volume: u64, thresholds: &VolumeThresholds) -> RiskLevel {
    if recent_volume >= thresholds.high_threshold {
        RiskLevel::High
    } else if recent_volume >= thresholds.medium_threshold {
        RiskLevel::Medium
    } else {
        RiskLevel::Unknown
    }
}

fn death_risk(death_reports: Option<u64>) -> RiskLevel {
    match death_reports {
        Some(count) if count > 0 => RiskLevel::High,
        _ => RiskLevel::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(
        pattern: TrendPattern,
        recent_volume: u64,
        death_reports: Option<u64>,
    ) -> DistrictStatus {
        synthesize(
            "Commonwealth",
            pattern,
            recent_volume,
            death_reports,
            &VolumeThresholds::default(),
            Utc::now(),
        )
    }

    #[test]
    fn spike_produces_immediate_action() {
        let status = status(TrendPattern::Spike, 3, Some(0));
        assert_eq!(status.pattern_based.status, "Immediate Action Required");
        assert_eq!(status.risk_level, RiskLevel::High);
    }

    #[test]
    fn stable_district_with_high_volume_still_alerts() {
        let status = status(TrendPattern::Stability, 30, Some(0));
        assert_eq!(status.report_based.status, "High Report Volume");
        assert_eq!(status.risk_level, RiskLevel::High);
    }

    #[test]
    fn unavailable_death_feed_degrades_to_sentinel() {
        let status = status(TrendPattern::Stability, 3, None);
        assert!(status.death_priority.is_none());
        // The degraded track contributes nothing beyond the other two.
        assert_eq!(status.risk_level, RiskLevel::Low);
    }

    #[test]
    fn death_reports_force_high_risk() {
        let status = status(TrendPattern::Decline, 0, Some(1));
        assert_eq!(status.death_priority.status, "Death Case Priority");
        assert_eq!(status.risk_level, RiskLevel::High);
    }

    #[test]
    fn zero_death_reports_are_not_a_priority() {
        let status = status(TrendPattern::Stability, 0, Some(0));
        assert!(status.death_priority.is_none());
    }

    #[test]
    fn no_signals_yields_unknown_risk_and_all_sentinels() {
        let status = status(TrendPattern::None, 0, None);
        assert!(status.pattern_based.is_none());
        assert!(status.report_based.is_none());
        assert!(status.death_priority.is_none());
        assert_eq!(status.risk_level, RiskLevel::Unknown);
    }

    #[test]
    fn gradual_rise_is_medium_risk() {
        let status = status(TrendPattern::GradualRise, 3, Some(0));
        assert_eq!(status.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn synthesis_is_idempotent_for_identical_input() {
        let now = Utc::now();
        let thresholds = VolumeThresholds::default();
        let a = synthesize("Payatas", TrendPattern::Spike, 12, Some(2), &thresholds, now);
        let b = synthesize("Payatas", TrendPattern::Spike, 12, Some(2), &thresholds, now);
        assert_eq!(a, b);
    }
}
