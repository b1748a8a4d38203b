//! Immutable store of district boundaries keyed by normalized name.
//!
//! Built once at startup (or on a boundary-file refresh) and shared
//! read-only by every resolver call thereafter.

use std::collections::BTreeMap;

use dengue_watch_boundary_models::BoundaryFieldMapping;
use geo::MultiPolygon;
use geojson::GeoJson;

use crate::{BoundaryError, extract, normalize::normalize_name};

/// A single district boundary with its parsed geometry.
///
/// The first ring of each polygon is the outer boundary; subsequent rings
/// are holes. Rings are closed by construction.
#[derive(Debug, Clone)]
pub struct DistrictBoundary {
    /// Canonical district name as it appears in the boundary file.
    pub name: String,
    /// Normalized matching key, see [`normalize_name`].
    pub key: String,
    /// District geometry.
    pub polygon: MultiPolygon<f64>,
}

/// Immutable collection of district boundaries, insertion-ordered.
#[derive(Debug, Default)]
pub struct BoundaryStore {
    boundaries: Vec<DistrictBoundary>,
    by_key: BTreeMap<String, usize>,
}

impl BoundaryStore {
    /// Loads a store from a `GeoJSON` `FeatureCollection` payload.
    ///
    /// Features with missing names, unparseable geometry, or malformed
    /// rings are logged and skipped; a duplicate district name replaces
    /// the earlier definition (last-write-wins) with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the payload itself is not valid JSON
    /// or is not a `FeatureCollection`.
    pub fn from_geojson(
        payload: &str,
        fields: &BoundaryFieldMapping,
    ) -> Result<Self, BoundaryError> {
        let value: serde_json::Value = serde_json::from_str(payload)?;
        let features = value
            .get("features")
            .and_then(serde_json::Value::as_array)
            .ok_or(BoundaryError::NotAFeatureCollection)?;

        let mut store = Self::default();
        for boundary in extract::extract_boundaries(features, fields) {
            match parse_multipolygon(&boundary.geometry_json) {
                Ok(polygon) => store.insert(boundary.name, polygon),
                Err(e) => {
                    log::warn!("Skipping district '{}': {e}", boundary.name);
                }
            }
        }

        log::info!("Loaded {} district boundaries", store.len());
        Ok(store)
    }

    /// Inserts a boundary, replacing any earlier one with the same
    /// normalized key. Replacement keeps the original insertion ordinal so
    /// resolution order stays stable across reloads.
    fn insert(&mut self, name: String, polygon: MultiPolygon<f64>) {
        let key = normalize_name(&name);
        if let Some(&idx) = self.by_key.get(&key) {
            log::warn!("Duplicate district name '{name}' (key '{key}'); keeping the later one");
            self.boundaries[idx] = DistrictBoundary { name, key, polygon };
        } else {
            self.by_key.insert(key.clone(), self.boundaries.len());
            self.boundaries.push(DistrictBoundary { name, key, polygon });
        }
    }

    /// Looks up a boundary by an already-normalized key.
    #[must_use]
    pub fn lookup_normalized(&self, key: &str) -> Option<&DistrictBoundary> {
        self.by_key.get(key).map(|&idx| &self.boundaries[idx])
    }

    /// Looks up a boundary by a raw district name from any source.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&DistrictBoundary> {
        self.lookup_normalized(&normalize_name(name))
    }

    /// Iterates boundaries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DistrictBoundary> {
        self.boundaries.iter()
    }

    /// Number of districts in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Returns `true` if the store holds no districts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

impl<'a> IntoIterator for &'a BoundaryStore {
    type Item = &'a DistrictBoundary;
    type IntoIter = std::slice::Iter<'a, DistrictBoundary>;

    fn into_iter(self) -> Self::IntoIter {
        self.boundaries.iter()
    }
}

/// Parses a `GeoJSON` geometry string into a validated [`MultiPolygon`].
/// Handles both `Polygon` and `MultiPolygon` geometry types.
///
/// # Errors
///
/// Returns [`BoundaryError`] for non-geometry payloads, unsupported
/// geometry types, or rings that violate the polygon contract.
pub fn parse_multipolygon(geometry_json: &str) -> Result<MultiPolygon<f64>, BoundaryError> {
    let geojson: GeoJson = geometry_json.parse()?;
    let GeoJson::Geometry(geometry) = geojson else {
        return Err(BoundaryError::MalformedGeometry {
            message: "expected a bare GeoJSON geometry".to_string(),
        });
    };

    validate_rings(&geometry.value)?;

    let geo_geometry: geo::Geometry<f64> = geometry.try_into()?;
    match geo_geometry {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        _ => Err(BoundaryError::MalformedGeometry {
            message: "expected Polygon or MultiPolygon geometry".to_string(),
        }),
    }
}

/// Validates the ring structure of a polygonal `GeoJSON` geometry.
fn validate_rings(value: &geojson::Value) -> Result<(), BoundaryError> {
    match value {
        geojson::Value::Polygon(rings) => validate_polygon_rings(rings),
        geojson::Value::MultiPolygon(polygons) => {
            polygons.iter().try_for_each(|p| validate_polygon_rings(p))
        }
        _ => Err(BoundaryError::MalformedGeometry {
            message: "expected Polygon or MultiPolygon geometry".to_string(),
        }),
    }
}

fn validate_polygon_rings(rings: &[Vec<Vec<f64>>]) -> Result<(), BoundaryError> {
    if rings.is_empty() {
        return Err(BoundaryError::MalformedGeometry {
            message: "polygon has no rings".to_string(),
        });
    }

    for ring in rings {
        // Rings are implicitly closed; an explicitly closed ring needs one
        // extra position to describe the same triangle.
        let min_positions = if ring.first() == ring.last() { 4 } else { 3 };
        if ring.len() < min_positions {
            return Err(BoundaryError::MalformedGeometry {
                message: format!("ring has only {} positions", ring.len()),
            });
        }

        for position in ring {
            if position.len() < 2 || position.iter().any(|c| !c.is_finite()) {
                return Err(BoundaryError::MalformedGeometry {
                    message: "ring contains a non-numeric position".to_string(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(features: &[serde_json::Value]) -> String {
        serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        })
        .to_string()
    }

    fn square_feature(name: &str, x: f64, y: f64) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": { "name": name },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y],
                ]],
            },
        })
    }

    #[test]
    fn loads_a_feature_collection() {
        let payload = collection(&[
            square_feature("Commonwealth", 0.0, 0.0),
            square_feature("Holy Spirit", 2.0, 0.0),
        ]);

        let store = BoundaryStore::from_geojson(&payload, &BoundaryFieldMapping::default()).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.lookup("commonwealth").is_some());
        assert!(store.lookup("HOLY  SPIRIT").is_some());
        assert!(store.lookup("batasan hills").is_none());
    }

    #[test]
    fn rejects_non_feature_collections() {
        let err = BoundaryStore::from_geojson("{\"type\": \"Polygon\"}", &BoundaryFieldMapping::default());
        assert!(matches!(err, Err(BoundaryError::NotAFeatureCollection)));
    }

    #[test]
    fn skips_malformed_rings_without_failing_the_load() {
        let degenerate = serde_json::json!({
            "type": "Feature",
            "properties": { "name": "Degenerate" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 1.0]]],
            },
        });
        let payload = collection(&[degenerate, square_feature("Commonwealth", 0.0, 0.0)]);

        let store = BoundaryStore::from_geojson(&payload, &BoundaryFieldMapping::default()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.lookup("Degenerate").is_none());
    }

    #[test]
    fn duplicate_names_keep_the_later_definition() {
        let payload = collection(&[
            square_feature("San Isidro", 0.0, 0.0),
            square_feature("san isidro", 5.0, 5.0),
        ]);

        let store = BoundaryStore::from_geojson(&payload, &BoundaryFieldMapping::default()).unwrap();
        assert_eq!(store.len(), 1);

        use geo::Contains;
        let boundary = store.lookup("San Isidro").unwrap();
        assert!(boundary.polygon.contains(&geo::Point::new(5.5, 5.5)));
    }

    #[test]
    fn parses_multipolygon_geometry() {
        let geometry = serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                [[[3.0, 3.0], [4.0, 3.0], [4.0, 4.0], [3.0, 3.0]]],
            ],
        })
        .to_string();

        let mp = parse_multipolygon(&geometry).unwrap();
        assert_eq!(mp.0.len(), 2);
    }

    #[test]
    fn rejects_point_geometry() {
        let geometry = serde_json::json!({
            "type": "Point",
            "coordinates": [0.0, 0.0],
        })
        .to_string();

        assert!(matches!(
            parse_multipolygon(&geometry),
            Err(BoundaryError::MalformedGeometry { .. })
        ));
    }
}
