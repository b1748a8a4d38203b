#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Trend pattern classification over weekly report series.
//!
//! Pure threshold/slope rules over the trailing window of a district's
//! completed-week counts. Classification of week *k* depends only on weeks
//! ≤ *k*: appending a new week never retroactively changes past labels, and
//! recomputation over the same series always yields the same label.
//!
//! Labels are mutually exclusive and evaluated in precedence order: spike
//! is urgent and must never be masked by a looser "rise" classification;
//! stability is the residual among the positive patterns, so it is checked
//! last before giving up.

use dengue_watch_analytics_models::TrendPattern;
use serde::{Deserialize, Serialize};

/// Classifier thresholds.
///
/// Inferred from qualitatively labeled output of the original surveillance
/// workflow; tunable configuration, to be re-validated against labeled
/// historical data before deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ClassifierConfig {
    /// Minimum completed weeks required to classify at all.
    pub min_weeks: usize,
    /// Trailing window length the rules are evaluated over.
    pub window_weeks: usize,
    /// Spike rule: latest must be at least this multiple of the prior mean.
    pub spike_multiplier: f64,
    /// Spike rule: latest must also exceed the prior mean by at least this
    /// absolute count, so 1→2 at low volume is not a spike.
    pub spike_min_delta: u64,
    /// Stability rule: every count must sit within this percentage of the
    /// window mean.
    pub stability_band_pct: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_weeks: 4,
            window_weeks: 4,
            spike_multiplier: 2.0,
            spike_min_delta: 5,
            stability_band_pct: 15.0,
        }
    }
}

/// Assigns a trend label to a contiguous, oldest-first series of completed
/// weekly counts.
///
/// Fewer than `min_weeks` counts yields [`TrendPattern::None`]:
/// insufficient data, not an error.
#[must_use]
pub fn classify(counts: &[u64], config: &ClassifierConfig) -> TrendPattern {
    if counts.len() < config.min_weeks.max(2) {
        return TrendPattern::None;
    }

    let window_len = config.window_weeks.clamp(2, counts.len());
    let window = &counts[counts.len() - window_len..];

    if is_spike(window, config) {
        TrendPattern::Spike
    } else if is_gradual_rise(window) {
        TrendPattern::GradualRise
    } else if is_decline(window) {
        TrendPattern::Decline
    } else if is_stable(window, config) {
        TrendPattern::Stability
    } else {
        TrendPattern::None
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(counts: &[u64]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    counts.iter().sum::<u64>() as f64 / counts.len() as f64
}

/// Latest completed week exceeds the mean of the preceding window weeks by
/// both the configured multiplier and the minimum absolute delta.
#[allow(clippy::cast_precision_loss)]
fn is_spike(window: &[u64], config: &ClassifierConfig) -> bool {
    let Some((&latest, prior)) = window.split_last() else {
        return false;
    };

    let prior_mean = mean(prior);
    let latest = latest as f64;

    latest >= config.spike_multiplier * prior_mean
        && latest - prior_mean >= config.spike_min_delta as f64
}

/// Week-over-week deltas across the window.
#[allow(clippy::cast_possible_wrap)]
fn deltas(window: &[u64]) -> Vec<i64> {
    window
        .windows(2)
        .map(|pair| pair[1] as i64 - pair[0] as i64)
        .collect()
}

#[allow(clippy::cast_possible_wrap)]
fn net_change(window: &[u64]) -> i64 {
    match (window.first(), window.last()) {
        (Some(&first), Some(&last)) => last as i64 - first as i64,
        _ => 0,
    }
}

/// Non-decreasing counts, allowing at most one flat or single-week dip,
/// with a strictly positive net change.
fn is_gradual_rise(window: &[u64]) -> bool {
    let dips = deltas(window).iter().filter(|&&d| d <= 0).count();
    dips <= 1 && net_change(window) > 0
}

/// Mirror of [`is_gradual_rise`]: sustained non-increasing trend.
fn is_decline(window: &[u64]) -> bool {
    let bumps = deltas(window).iter().filter(|&&d| d >= 0).count();
    bumps <= 1 && net_change(window) < 0
}

/// Every count within the configured band of the window mean. An all-zero
/// window is stable. The band is measured against the mean rather than the
/// previous week: a strict week-over-week reading rejects series that the
/// surveillance staff label stable (one 11→9 step in an otherwise flat
/// series is an 18% drop).
#[allow(clippy::cast_precision_loss)]
fn is_stable(window: &[u64], config: &ClassifierConfig) -> bool {
    let window_mean = mean(window);
    if window_mean == 0.0 {
        return true;
    }

    let band = config.stability_band_pct / 100.0;
    window
        .iter()
        .all(|&count| ((count as f64 - window_mean) / window_mean).abs() <= band)
}
