//! Extracts raw `GeoJSON` features into [`NormalizedBoundary`] values.
//!
//! Uses the source's [`BoundaryFieldMapping`] to pull the district name out
//! of each feature, regardless of which property the publishing office used
//! for it.

use dengue_watch_boundary_models::{BoundaryFieldMapping, NormalizedBoundary};

/// Extracts a list of raw `GeoJSON` features into boundaries.
///
/// Skips features with missing names or empty geometries.
#[must_use]
pub fn extract_boundaries(
    features: &[serde_json::Value],
    fields: &BoundaryFieldMapping,
) -> Vec<NormalizedBoundary> {
    features
        .iter()
        .filter_map(|feature| extract_boundary(feature, fields))
        .collect()
}

/// Extracts a single `GeoJSON` feature.
fn extract_boundary(
    feature: &serde_json::Value,
    fields: &BoundaryFieldMapping,
) -> Option<NormalizedBoundary> {
    let props = feature.get("properties")?;

    // Extract the district name
    let name = props
        .get(&fields.name)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let geom = feature.get("geometry")?;
    if geom.is_null() {
        return None;
    }
    let geometry_json = serde_json::to_string(geom).ok()?;

    Some(NormalizedBoundary {
        name,
        geometry_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(name_prop: &str, name: &str) -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "properties": { name_prop: name },
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            },
        })
    }

    #[test]
    fn extracts_name_via_field_mapping() {
        let fields = BoundaryFieldMapping::new("BRGY_NAME");
        let features = vec![feature("BRGY_NAME", "Commonwealth")];

        let boundaries = extract_boundaries(&features, &fields);
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].name, "Commonwealth");
        assert!(boundaries[0].geometry_json.contains("Polygon"));
    }

    #[test]
    fn skips_features_missing_the_name_property() {
        let fields = BoundaryFieldMapping::new("BRGY_NAME");
        let features = vec![feature("OTHER_PROP", "Commonwealth")];

        assert!(extract_boundaries(&features, &fields).is_empty());
    }

    #[test]
    fn skips_features_with_blank_names_or_null_geometry() {
        let fields = BoundaryFieldMapping::default();
        let blank = feature("name", "   ");
        let null_geom = serde_json::json!({
            "type": "Feature",
            "properties": { "name": "Holy Spirit" },
            "geometry": null,
        });

        assert!(extract_boundaries(&[blank, null_geom], &fields).is_empty());
    }
}
