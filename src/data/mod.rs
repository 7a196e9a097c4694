//! Feature ingestion: document parsing, acceptance filtering, the global bounds
//! pass, and per-feature province construction.

use geojson::{Geometry, JsonObject, JsonValue, Position, Value};

use crate::error::{LoadError, Result};
use crate::map::{normalize_ring, GeoBounds, Point, Projection, Province, ProvinceGeometry, Rgba};

/// How the region-level tag can rescue a feature below the admin-level threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum NutsFallback {
    /// `tag == "3" && tag == "0"`. Never holds, so only the admin level decides.
    #[default]
    Preserved,
    /// `tag == "3" || tag == "0"`: NUTS-3 regions and whole NUTS-0 countries pass
    Either,
}

impl NutsFallback {
    fn matches(self, tag: &str) -> bool {
        match self {
            Self::Preserved => tag == "3" && tag == "0",
            Self::Either => tag == "3" || tag == "0",
        }
    }
}

/// Acceptance rule deciding which features become provinces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFilter {
    pub min_admin_level: i64,
    pub nuts_fallback: NutsFallback,
}

impl Default for FeatureFilter {
    fn default() -> Self {
        Self {
            min_admin_level: 4,
            nuts_fallback: NutsFallback::Preserved,
        }
    }
}

impl FeatureFilter {
    pub fn accepts(&self, properties: &JsonObject) -> bool {
        admin_level(properties) >= self.min_admin_level
            || self.nuts_fallback.matches(&string_prop(properties, "nuts_level"))
    }
}

/// One entry of the document's feature list. The geometry stays raw JSON until
/// the feature has passed the filter.
#[derive(Debug, Clone, Default)]
pub struct RawFeature {
    pub properties: Option<JsonObject>,
    pub geometry: Option<JsonValue>,
}

impl RawFeature {
    fn from_object(mut object: JsonObject) -> Self {
        let properties = match object.remove("properties") {
            Some(JsonValue::Object(props)) => Some(props),
            _ => None,
        };
        let geometry = object.remove("geometry").filter(|g| !g.is_null());
        Self { properties, geometry }
    }
}

/// An accepted feature with its rings still in geographic `(lon, lat)` form
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Position of the feature in the source collection
    pub index: usize,
    pub properties: JsonObject,
    pub rings: Vec<Vec<Point>>,
}

/// Parse raw bytes into the feature list. simd-json parses in place, hence `&mut`.
///
/// Only the document shape is checked here: a root `Feature` counts as a one-element
/// collection, otherwise `features` is read with a default of none (so a bare Geometry
/// root has no features). Non-object entries are skipped.
pub fn parse_features(bytes: &mut [u8]) -> Result<Vec<RawFeature>> {
    let mut root: JsonObject = simd_json::serde::from_slice(bytes)?;

    if root.get("type").and_then(JsonValue::as_str) == Some("Feature") {
        return Ok(vec![RawFeature::from_object(root)]);
    }

    let entries = match root.remove("features") {
        Some(JsonValue::Array(entries)) => entries,
        _ => Vec::new(),
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            JsonValue::Object(object) => Some(RawFeature::from_object(object)),
            _ => None,
        })
        .collect())
}

/// Apply the filter and extract geometry for every accepted feature.
/// Malformed geometry on an accepted feature aborts with a parse-class error;
/// rejected features are never inspected.
pub fn select_candidates(features: Vec<RawFeature>, filter: &FeatureFilter) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();

    for (index, feature) in features.into_iter().enumerate() {
        let Some(properties) = feature.properties else {
            continue;
        };
        if !filter.accepts(&properties) {
            continue;
        }

        let value = feature
            .geometry
            .ok_or_else(|| LoadError::invalid_feature(index, "missing geometry"))?;
        let geometry = Geometry::from_json_value(value)
            .map_err(|e| LoadError::invalid_feature(index, e.to_string()))?;

        let rings = extract_rings(&geometry.value, index)?;
        candidates.push(Candidate {
            index,
            properties,
            rings,
        });
    }

    Ok(candidates)
}

/// Flatten Polygon / MultiPolygon rings; other geometry kinds contribute nothing
fn extract_rings(value: &Value, index: usize) -> Result<Vec<Vec<Point>>> {
    let polygons: Vec<&Vec<Vec<Position>>> = match value {
        Value::Polygon(rings) => vec![rings],
        Value::MultiPolygon(polygons) => polygons.iter().collect(),
        _ => Vec::new(),
    };

    let mut out = Vec::new();
    for rings in polygons {
        for ring in rings {
            let points = ring
                .iter()
                .map(|pos| lon_lat(pos, index))
                .collect::<Result<Vec<_>>>()?;
            out.push(points);
        }
    }
    Ok(out)
}

fn lon_lat(pos: &Position, index: usize) -> Result<Point> {
    match pos.as_slice() {
        [lon, lat, ..] => Ok(Point::new(*lon, *lat)),
        _ => Err(LoadError::invalid_feature(index, "position with fewer than two ordinates")),
    }
}

/// First pass: geographic extent over every coordinate of every candidate
pub fn compute_bounds(candidates: &[Candidate]) -> GeoBounds {
    let mut bounds = GeoBounds::EMPTY;
    for candidate in candidates {
        for ring in &candidate.rings {
            for geo in ring {
                bounds.include(geo.y, geo.x);
            }
        }
    }
    bounds
}

/// Second pass for one feature: project, normalize and triangulate each ring.
/// Returns None when no ring survives.
pub fn build_province(candidate: &Candidate, projection: &Projection) -> Option<Province> {
    let props = &candidate.properties;
    let id = string_prop(props, "region_id");

    let mut geometry = ProvinceGeometry::default();
    for ring in &candidate.rings {
        let projected = ring.iter().map(|geo| projection.project(geo.y, geo.x)).collect();
        if let Some(ring) = normalize_ring(projected) {
            geometry.push_ring(ring);
        }
    }

    if geometry.is_empty() {
        log::debug!("Skipping feature #{} ({}): no rings", candidate.index, id);
        return None;
    }

    Some(Province {
        color: Rgba::pastel(&id),
        name: string_prop(props, "region_name"),
        name_en: string_prop(props, "region_name_en"),
        name_local: string_prop(props, "region_name_local"),
        country_code: string_prop(props, "country_code"),
        admin_level: admin_level(props),
        nuts_level: string_prop(props, "nuts_level"),
        mountain_type: float_prop(props, "mount_type"),
        urban_type: float_prop(props, "urban_type"),
        coast_type: float_prop(props, "coast_type"),
        geometry,
        id,
    })
}

fn string_prop(props: &JsonObject, key: &str) -> String {
    props
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

fn float_prop(props: &JsonObject, key: &str) -> f64 {
    props.get(key).and_then(|v| v.as_f64()).unwrap_or(0.0)
}

/// Integer admin level; tolerates whole-number floats such as `4.0`
fn admin_level(props: &JsonObject) -> i64 {
    props
        .get("admin_level")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(json: &str) -> Vec<RawFeature> {
        let mut bytes = json.as_bytes().to_vec();
        parse_features(&mut bytes).unwrap()
    }

    fn props(json: &str) -> JsonObject {
        match json.parse::<geojson::JsonValue>().unwrap() {
            geojson::JsonValue::Object(o) => o,
            _ => panic!("not an object"),
        }
    }

    const MIXED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": null,
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } },
            { "type": "Feature", "properties": { "region_id": "LOW", "admin_level": 2, "nuts_level": "3" },
              "geometry": null },
            { "type": "Feature", "properties": { "region_id": "OK", "admin_level": 4 },
              "geometry": { "type": "Polygon", "coordinates": [[[10,40],[12,40],[12,42],[10,40]]] } },
            { "type": "Feature", "properties": { "region_id": "PT", "admin_level": 6 },
              "geometry": { "type": "Point", "coordinates": [5, 5] } }
        ]
    }"#;

    #[test]
    fn test_default_filter_uses_admin_level_only() {
        let filter = FeatureFilter::default();
        assert!(filter.accepts(&props(r#"{"admin_level": 4}"#)));
        assert!(filter.accepts(&props(r#"{"admin_level": 8.0}"#)));
        assert!(!filter.accepts(&props(r#"{"admin_level": 3}"#)));
        assert!(!filter.accepts(&props(r#"{"admin_level": 2, "nuts_level": "3"}"#)));
        assert!(!filter.accepts(&props(r#"{"nuts_level": "0"}"#)));
        assert!(!filter.accepts(&props(r#"{}"#)));
    }

    #[test]
    fn test_either_fallback() {
        let filter = FeatureFilter {
            nuts_fallback: NutsFallback::Either,
            ..FeatureFilter::default()
        };
        assert!(filter.accepts(&props(r#"{"admin_level": 2, "nuts_level": "3"}"#)));
        assert!(filter.accepts(&props(r#"{"nuts_level": "0"}"#)));
        assert!(!filter.accepts(&props(r#"{"nuts_level": "2"}"#)));
    }

    #[test]
    fn test_rejected_features_not_inspected() {
        // Feature 1 has null geometry but fails the filter, so no error
        let features = features(MIXED);
        let candidates = select_candidates(features, &FeatureFilter::default()).unwrap();
        let ids: Vec<_> = candidates.iter().map(|c| c.index).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(candidates[0].rings.len(), 1);
        assert!(candidates[1].rings.is_empty());
    }

    #[test]
    fn test_accepted_null_geometry_is_error() {
        let json = r#"{"type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "admin_level": 5 }, "geometry": null }
        ]}"#;
        let features = features(json);
        let err = select_candidates(features, &FeatureFilter::default()).unwrap_err();
        assert!(err.is_parse());
        assert!(matches!(err, LoadError::InvalidFeature { index: 0, .. }));
    }

    #[test]
    fn test_short_position_is_error() {
        let json = r#"{"type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "admin_level": 5 },
              "geometry": { "type": "Polygon", "coordinates": [[[1],[2,2],[3,3]]] } }
        ]}"#;
        let err = select_candidates(features(json), &FeatureFilter::default()).unwrap_err();
        assert!(err.is_parse());
        assert!(matches!(err, LoadError::InvalidFeature { index: 0, .. }));
    }

    #[test]
    fn test_malformed_geometry_on_rejected_feature_ignored() {
        let json = r#"{"type": "FeatureCollection", "features": [
            { "type": "Feature", "properties": { "region_id": "DE", "admin_level": 2 },
              "geometry": { "type": "Polygon" } },
            { "type": "Feature", "properties": { "region_id": "XX", "admin_level": 2 },
              "geometry": { "coordinates": 7 } },
            { "type": "Feature", "properties": { "region_id": "DE1", "admin_level": 4 },
              "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } }
        ]}"#;
        let candidates = select_candidates(features(json), &FeatureFilter::default()).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].index, 2);
    }

    #[test]
    fn test_accepted_geometry_without_kind_or_coordinates() {
        for geometry in [
            r#"{ "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] }"#,
            r#"{ "type": "Polygon" }"#,
            r#"{ "type": "Polygon", "coordinates": null }"#,
        ] {
            let json = format!(
                r#"{{"type": "FeatureCollection", "features": [
                    {{ "type": "Feature", "properties": {{ "admin_level": 4 }}, "geometry": {geometry} }}
                ]}}"#
            );
            let err = select_candidates(features(&json), &FeatureFilter::default()).unwrap_err();
            assert!(err.is_parse(), "{geometry}");
        }
    }

    #[test]
    fn test_bounds_swap_lon_lat() {
        let features = features(MIXED);
        let candidates = select_candidates(features, &FeatureFilter::default()).unwrap();
        let bounds = compute_bounds(&candidates);
        assert_eq!(bounds.min_lon, 10.0);
        assert_eq!(bounds.max_lon, 12.0);
        assert_eq!(bounds.min_lat, 40.0);
        assert_eq!(bounds.max_lat, 42.0);
    }

    #[test]
    fn test_bounds_empty_without_candidates() {
        assert!(compute_bounds(&[]).is_empty());
    }

    #[test]
    fn test_build_province_reads_properties() {
        let json = r#"{"type": "FeatureCollection", "features": [
            { "type": "Feature",
              "properties": { "region_id": "AT130", "region_name": "Wien", "region_name_en": "Vienna",
                              "region_name_local": "Wien", "country_code": "AT", "admin_level": 4,
                              "nuts_level": "3", "mount_type": 4.0, "urban_type": 1.0, "coast_type": 3.0 },
              "geometry": { "type": "Polygon", "coordinates": [[[16,48],[17,48],[17,49],[16,49],[16,48]]] } }
        ]}"#;
        let features = features(json);
        let candidates = select_candidates(features, &FeatureFilter::default()).unwrap();
        let projection = Projection::new(compute_bounds(&candidates), 200.0, 100.0);
        let province = build_province(&candidates[0], &projection).unwrap();

        assert_eq!(province.id, "AT130");
        assert_eq!(province.display_name(), "Vienna");
        assert_eq!(province.country_code, "AT");
        assert_eq!(province.nuts_level, "3");
        assert_eq!(province.mountain_type, 4.0);
        assert_eq!(province.coast_type, 3.0);
        assert_eq!(province.color, Rgba::pastel("AT130"));
        // Closed 5-point input ring loses its closing point
        assert_eq!(province.geometry.polygons[0].len(), 4);
        assert_eq!(province.geometry.polygon_indices[0].len(), 6);
    }

    #[test]
    fn test_build_province_without_rings() {
        let features = features(MIXED);
        let candidates = select_candidates(features, &FeatureFilter::default()).unwrap();
        let projection = Projection::new(compute_bounds(&candidates), 100.0, 100.0);
        assert!(build_province(&candidates[1], &projection).is_none());
    }

    #[test]
    fn test_parse_error_on_garbage() {
        let mut bytes = b"{ not json".to_vec();
        assert!(matches!(parse_features(&mut bytes), Err(LoadError::Parse(_))));
    }

    #[test]
    fn test_single_feature_root() {
        let json = r#"{ "type": "Feature", "properties": { "admin_level": 4 },
            "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } }"#;
        let features = features(json);
        assert_eq!(features.len(), 1);
        assert!(features[0].properties.is_some());
        assert!(features[0].geometry.is_some());
    }

    #[test]
    fn test_loose_document_shape() {
        // No top-level type; entries that are not objects are skipped
        let json = r#"{ "features": [ 3, { "type": "Feature", "properties": { "admin_level": 4 }, "geometry": null } ] }"#;
        let parsed = features(json);
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].geometry.is_none());

        assert!(features(r#"{ "type": "Polygon", "coordinates": [] }"#).is_empty());
        assert!(features(r#"{ "type": "FeatureCollection" }"#).is_empty());

        let mut bytes = b"[1, 2]".to_vec();
        assert!(parse_features(&mut bytes).unwrap_err().is_parse());
    }
}
