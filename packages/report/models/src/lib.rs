#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Report event taxonomy and validated report types.
//!
//! This crate defines the canonical report categories used across the
//! dengue-watch system. All submission channels (mobile app, hotline
//! transcription, field encoders) normalize their source-specific report
//! types into this shared taxonomy before events reach the analysis core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Category of a citizen report.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportCategory {
    /// Stagnant water, containers, or other mosquito breeding sites
    BreedingSite,
    /// Symptoms consistent with dengue, not yet clinically confirmed
    SuspectedCase,
    /// Laboratory- or clinically-confirmed dengue case
    ConfirmedCase,
    /// A death attributed to dengue
    DeathCase,
    /// Reports that don't map to any other category
    Other,
}

impl ReportCategory {
    /// Returns `true` if this category represents a death-linked report.
    ///
    /// Death-linked reports feed the `death_priority` alert track and force
    /// district risk to high while unresolved.
    #[must_use]
    pub const fn is_death_linked(self) -> bool {
        matches!(self, Self::DeathCase)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::BreedingSite,
            Self::SuspectedCase,
            Self::ConfirmedCase,
            Self::DeathCase,
            Self::Other,
        ]
    }
}

/// Validation state of a report in the staff review workflow.
///
/// Only validated reports are visible to the analysis core.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    /// Submitted, awaiting staff review
    Pending,
    /// Confirmed by staff as a genuine report
    Validated,
    /// Rejected as spam, duplicate, or out of scope
    Rejected,
}

/// A WGS84 coordinate in (longitude, latitude) order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Longitude in decimal degrees.
    pub lon: f64,
    /// Latitude in decimal degrees.
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate.
    #[must_use]
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns `true` if both components are finite and within WGS84 range.
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A report as delivered by the ingestion feed.
///
/// `district_hint` carries the submitter-selected district name, which comes
/// from an independently maintained name list and may not match the boundary
/// file spelling; the engine matches it by normalized name and falls back to
/// coordinate resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// Report location.
    pub coordinate: Coordinate,
    /// Report category.
    pub category: ReportCategory,
    /// When the reported condition was observed (UTC).
    pub occurred_at: DateTime<Utc>,
    /// Validation state at time of delivery.
    pub status: ValidationStatus,
    /// District name as entered by the submitter, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district_hint: Option<String>,
}

/// A validated report event after district resolution.
///
/// `district` is set exactly once by the resolver; timestamp and status are
/// immutable after validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEvent {
    /// Unique report identifier.
    pub id: Uuid,
    /// Report location.
    pub coordinate: Coordinate,
    /// Report category.
    pub category: ReportCategory,
    /// Canonical district name, `None` when the point is outside coverage.
    pub district: Option<String>,
    /// When the reported condition was observed (UTC).
    pub occurred_at: DateTime<Utc>,
    /// Validation state.
    pub status: ValidationStatus,
}

impl ReportEvent {
    /// Builds an event from an incoming feed report and its resolved
    /// district.
    #[must_use]
    pub fn from_incoming(report: IncomingReport, district: Option<String>) -> Self {
        Self {
            id: report.id,
            coordinate: report.coordinate,
            category: report.category,
            district,
            occurred_at: report.occurred_at,
            status: report.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_case_is_death_linked() {
        assert!(ReportCategory::DeathCase.is_death_linked());
        assert!(!ReportCategory::BreedingSite.is_death_linked());
        assert!(!ReportCategory::ConfirmedCase.is_death_linked());
    }

    #[test]
    fn category_round_trips_through_strings() {
        for category in ReportCategory::all() {
            let text = category.to_string();
            let parsed: ReportCategory = text.parse().unwrap();
            assert_eq!(*category, parsed);
        }
    }

    #[test]
    fn coordinate_validity() {
        assert!(Coordinate::new(120.98, 14.60).is_valid());
        assert!(!Coordinate::new(f64::NAN, 14.60).is_valid());
        assert!(!Coordinate::new(200.0, 14.60).is_valid());
        assert!(!Coordinate::new(120.98, -95.0).is_valid());
    }

    #[test]
    fn incoming_report_deserializes_without_hint() {
        let json = r#"{
            "id": "8f2d84b6-3a86-4f3e-9d0e-5f2f6a1f9f11",
            "coordinate": { "lon": 120.98, "lat": 14.6 },
            "category": "BREEDING_SITE",
            "occurredAt": "2026-07-06T08:30:00Z",
            "status": "VALIDATED"
        }"#;

        let report: IncomingReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.category, ReportCategory::BreedingSite);
        assert_eq!(report.status, ValidationStatus::Validated);
        assert!(report.district_hint.is_none());
    }
}
