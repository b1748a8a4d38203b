#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory spatial index for district resolution.
//!
//! Builds an R-tree over the boundary store at startup and answers
//! "which district owns this coordinate" by envelope pre-filtering followed
//! by an exact point-in-polygon test. Used both to tag incoming reports and
//! to resolve manually pinned locations.

use dengue_watch_boundary::BoundaryStore;
use geo::{BoundingRect, Contains, MultiPolygon};
use rstar::{AABB, Envelope, RTree, RTreeObject};

/// A district polygon stored in the R-tree with its metadata.
struct DistrictEntry {
    /// Store insertion ordinal; the tie-break key when boundaries
    /// erroneously overlap.
    ordinal: usize,
    name: String,
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
}

impl RTreeObject for DistrictEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Pre-built spatial index over an immutable boundary snapshot.
///
/// Constructed once and shared across all consumers; resolution is a pure
/// function and safe for concurrent use.
pub struct DistrictIndex {
    tree: RTree<DistrictEntry>,
    /// Bounding box of the whole service area, `None` for an empty store.
    coverage: Option<AABB<[f64; 2]>>,
}

impl DistrictIndex {
    /// Builds the index from a boundary store snapshot.
    #[must_use]
    pub fn build(store: &BoundaryStore) -> Self {
        let entries: Vec<DistrictEntry> = store
            .iter()
            .enumerate()
            .map(|(ordinal, boundary)| DistrictEntry {
                ordinal,
                name: boundary.name.clone(),
                envelope: compute_envelope(&boundary.polygon),
                polygon: boundary.polygon.clone(),
            })
            .collect();

        let coverage = entries
            .iter()
            .map(|e| e.envelope)
            .reduce(|a, b| a.merged(&b));

        log::info!("Built district index over {} boundaries", entries.len());

        Self {
            tree: RTree::bulk_load(entries),
            coverage,
        }
    }

    /// Resolves a coordinate to the owning district name.
    ///
    /// Returns `None` when the point lies outside every known district:
    /// a normal outcome for pins outside the service area, not a failure.
    /// When boundaries erroneously overlap, the district loaded first wins,
    /// independent of R-tree candidate order.
    #[must_use]
    pub fn resolve(&self, lon: f64, lat: f64) -> Option<&str> {
        if !lon.is_finite() || !lat.is_finite() {
            log::debug!("Refusing to resolve non-finite coordinate ({lon}, {lat})");
            return None;
        }

        let query = [lon, lat];
        if !self.coverage.is_some_and(|c| c.contains_point(&query)) {
            return None;
        }

        let point = geo::Point::new(lon, lat);
        let query_env = AABB::from_point(query);

        let mut best: Option<&DistrictEntry> = None;
        for entry in self.tree.locate_in_envelope_intersecting(&query_env) {
            if entry.polygon.contains(&point) {
                match best {
                    None => best = Some(entry),
                    Some(current) if entry.ordinal < current.ordinal => {
                        best = Some(entry);
                    }
                    _ => {}
                }
            }
        }

        best.map(|e| e.name.as_str())
    }

    /// Number of indexed districts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` if no districts are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    mp.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use dengue_watch_boundary_models::BoundaryFieldMapping;

    fn store_from(features: &[serde_json::Value]) -> BoundaryStore {
        let payload = serde_json::json!({
            "type": "FeatureCollection",
            "features": features,
        })
        .to_string();
        BoundaryStore::from_geojson(&payload, &BoundaryFieldMapping::default()).unwrap()
    }

    fn square(name: &str, x: f64, y: f64, size: f64) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": { "name": name },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [x, y], [x + size, y], [x + size, y + size], [x, y + size], [x, y],
                ]],
            },
        })
    }

    #[test]
    fn resolves_interior_points() {
        let store = store_from(&[square("Commonwealth", 0.0, 0.0, 1.0)]);
        let index = DistrictIndex::build(&store);

        assert_eq!(index.resolve(0.5, 0.5), Some("Commonwealth"));
    }

    #[test]
    fn outside_points_resolve_to_none() {
        let store = store_from(&[square("Commonwealth", 0.0, 0.0, 1.0)]);
        let index = DistrictIndex::build(&store);

        assert_eq!(index.resolve(5.0, 5.0), None);
        assert_eq!(index.resolve(-0.1, 0.5), None);
    }

    #[test]
    fn non_finite_coordinates_resolve_to_none() {
        let store = store_from(&[square("Commonwealth", 0.0, 0.0, 1.0)]);
        let index = DistrictIndex::build(&store);

        assert_eq!(index.resolve(f64::NAN, 0.5), None);
        assert_eq!(index.resolve(0.5, f64::INFINITY), None);
    }

    #[test]
    fn points_inside_holes_are_excluded() {
        let donut = serde_json::json!({
            "type": "Feature",
            "properties": { "name": "Donut" },
            "geometry": {
                "type": "Polygon",
                "coordinates": [
                    [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
                    [[4.0, 4.0], [6.0, 4.0], [6.0, 6.0], [4.0, 6.0], [4.0, 4.0]],
                ],
            },
        });
        let store = store_from(&[donut]);
        let index = DistrictIndex::build(&store);

        assert_eq!(index.resolve(1.0, 1.0), Some("Donut"));
        assert_eq!(index.resolve(5.0, 5.0), None);
    }

    #[test]
    fn overlapping_boundaries_resolve_to_the_first_loaded() {
        // Overlap is a data error; resolution must still be deterministic.
        let store = store_from(&[
            square("First", 0.0, 0.0, 2.0),
            square("Second", 1.0, 1.0, 2.0),
        ]);
        let index = DistrictIndex::build(&store);

        assert_eq!(index.resolve(1.5, 1.5), Some("First"));
        assert_eq!(index.resolve(2.5, 2.5), Some("Second"));
    }

    #[test]
    fn each_non_overlapping_district_owns_its_interior() {
        let store = store_from(&[
            square("A", 0.0, 0.0, 1.0),
            square("B", 2.0, 0.0, 1.0),
            square("C", 4.0, 0.0, 1.0),
        ]);
        let index = DistrictIndex::build(&store);

        assert_eq!(index.resolve(0.5, 0.5), Some("A"));
        assert_eq!(index.resolve(2.5, 0.5), Some("B"));
        assert_eq!(index.resolve(4.5, 0.5), Some("C"));
    }
}
