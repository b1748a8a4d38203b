//! Analysis configuration.
//!
//! All tunable thresholds for the classifier, alert synthesizer, and
//! effectiveness analyzer live here. A default TOML is embedded at compile
//! time; deployments override it with a config file.

use dengue_watch_alert::VolumeThresholds;
use dengue_watch_classify::ClassifierConfig;
use dengue_watch_intervention::InterventionConfig;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Embedded default thresholds. Parse failures indicate a development
/// error and are caught by a test.
const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Top-level analysis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Pattern classifier thresholds.
    pub classifier: ClassifierConfig,
    /// Report-volume alert thresholds.
    pub volume: VolumeThresholds,
    /// Effectiveness analyzer thresholds.
    pub intervention: InterventionConfig,
    /// Shared analysis windows.
    pub analysis: AnalysisWindow,
}

/// Windows shared across the recomputation cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalysisWindow {
    /// Completed weeks of history served and classified per district.
    pub series_weeks: u32,
}

impl Default for AnalysisWindow {
    fn default() -> Self {
        Self { series_weeks: 8 }
    }
}

impl AnalysisConfig {
    /// Returns the compiled-in default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. Since it is a
    /// compile-time constant, a parse failure is a development error and
    /// is caught during CI.
    #[must_use]
    pub fn embedded_default() -> Self {
        toml::de::from_str(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
    }

    /// Parses a configuration from TOML text. Missing sections and fields
    /// fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the TOML is malformed.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Loads a configuration override file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] if the file cannot be read or parsed.
    pub fn load(path: &std::path::Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_default_parses() {
        let config = AnalysisConfig::embedded_default();
        assert_eq!(config.classifier.min_weeks, 4);
        assert_eq!(config.volume.high_threshold, 25);
        assert_eq!(config.intervention.maturation_days, 120);
        assert_eq!(config.analysis.series_weeks, 8);
    }

    #[test]
    fn embedded_default_matches_the_code_defaults() {
        let embedded = AnalysisConfig::embedded_default();
        let coded = AnalysisConfig::default();

        assert_eq!(embedded.classifier.min_weeks, coded.classifier.min_weeks);
        assert_eq!(
            embedded.classifier.spike_min_delta,
            coded.classifier.spike_min_delta
        );
        assert_eq!(embedded.volume.recent_weeks, coded.volume.recent_weeks);
        assert_eq!(
            embedded.intervention.window_weeks,
            coded.intervention.window_weeks
        );
        assert_eq!(embedded.analysis.series_weeks, coded.analysis.series_weeks);
    }

    #[test]
    fn partial_override_keeps_defaults_elsewhere() {
        let config = AnalysisConfig::from_toml_str(
            "[classifier]\nspike_multiplier = 3.0\n",
        )
        .unwrap();

        assert!((config.classifier.spike_multiplier - 3.0).abs() < f64::EPSILON);
        assert_eq!(config.classifier.min_weeks, 4);
        assert_eq!(config.volume.medium_threshold, 10);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AnalysisConfig::from_toml_str("[classifier\n").is_err());
    }
}
