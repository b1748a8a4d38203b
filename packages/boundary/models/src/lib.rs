#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District boundary field-mapping and normalization types.
//!
//! Boundary files are maintained by local government units and differ in
//! which feature property carries the district name, so the mapping is
//! configurable per source.

use serde::{Deserialize, Serialize};

/// Field mapping for extracting the district name from raw features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryFieldMapping {
    /// Property field containing the district name.
    pub name: String,
}

impl BoundaryFieldMapping {
    /// Creates a mapping reading the district name from `property`.
    #[must_use]
    pub fn new(property: impl Into<String>) -> Self {
        Self {
            name: property.into(),
        }
    }
}

impl Default for BoundaryFieldMapping {
    fn default() -> Self {
        Self::new("name")
    }
}

/// A normalized district boundary, ready for geometry parsing.
#[derive(Debug, Clone)]
pub struct NormalizedBoundary {
    /// Human-readable district name.
    pub name: String,
    /// `GeoJSON` geometry as a JSON string.
    pub geometry_json: String,
}
