#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District boundary loading, name normalization, and lookup.
//!
//! Parses barangay polygon boundaries from `GeoJSON` feature collections,
//! normalizes district names so that independently maintained name lists
//! match, and exposes an immutable [`store::BoundaryStore`] shared by all
//! resolver calls.

pub mod extract;
pub mod normalize;
pub mod store;

pub use store::{BoundaryStore, DistrictBoundary};

use thiserror::Error;

/// Errors that can occur while loading boundary data.
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// The payload could not be parsed as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed as JSON but is not a `GeoJSON` `FeatureCollection`.
    #[error("Boundary payload is not a GeoJSON FeatureCollection")]
    NotAFeatureCollection,

    /// A geometry could not be parsed as `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    Geojson(#[from] geojson::Error),

    /// A geometry parsed but violates the polygon ring contract.
    #[error("Malformed geometry: {message}")]
    MalformedGeometry {
        /// Description of what went wrong.
        message: String,
    },
}
