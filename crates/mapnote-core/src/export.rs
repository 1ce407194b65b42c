//! GeoJSON export and import.
//!
//! The annotation store is the only export source. Each annotation becomes a
//! Feature whose properties are `{id, title, description, type}`; circles add
//! a `radius` in meters because GeoJSON has no circle geometry.

use crate::error::ExportError;
use crate::model::{Annotation, AnnotationKind, Geometry, LatLng};
use crate::store::AnnotationStore;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue, Value};

/// Default download filename.
pub const EXPORT_FILENAME: &str = "annotations.geojson";

/// Properties written by the exporter; everything else is passed through on import.
const RESERVED_PROPERTIES: [&str; 5] = ["id", "title", "description", "type", "radius"];

// ─── Export ──────────────────────────────────────────────────────────────

/// Build a FeatureCollection over the whole store, in store order.
pub fn to_feature_collection(store: &AnnotationStore) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: store.iter().map(to_feature).collect(),
        foreign_members: None,
    }
}

/// Serialize the store as pretty-printed GeoJSON (2-space indent).
pub fn to_geojson_string(store: &AnnotationStore) -> Result<String, ExportError> {
    let collection = to_feature_collection(store);
    Ok(serde_json::to_string_pretty(&collection)?)
}

/// One annotation as a GeoJSON Feature.
pub fn to_feature(annotation: &Annotation) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".into(), JsonValue::from(annotation.id.0));
    properties.insert("title".into(), JsonValue::from(annotation.title.clone()));
    properties.insert(
        "description".into(),
        JsonValue::from(annotation.description.clone()),
    );
    properties.insert("type".into(), JsonValue::from(annotation.kind.as_str()));
    if let Geometry::Circle { radius_m, .. } = annotation.geometry {
        properties.insert("radius".into(), JsonValue::from(radius_m));
    }

    Feature {
        bbox: None,
        geometry: Some(to_geojson_geometry(&annotation.geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Convert typed geometry to its GeoJSON form. Polygon rings are closed.
pub fn to_geojson_geometry(geometry: &Geometry) -> geojson::Geometry {
    let value = match geometry {
        Geometry::Point { at } => Value::Point(at.to_position()),
        Geometry::Circle { center, .. } => Value::Point(center.to_position()),
        Geometry::LineString { points } => {
            Value::LineString(points.iter().map(|p| p.to_position()).collect())
        }
        Geometry::Polygon { ring } => {
            let mut positions: Vec<Vec<f64>> = ring.iter().map(|p| p.to_position()).collect();
            if let (Some(first), Some(last)) = (ring.first(), ring.last())
                && first != last
            {
                positions.push(first.to_position());
            }
            Value::Polygon(vec![positions])
        }
    };
    geojson::Geometry::new(value)
}

// ─── Import ──────────────────────────────────────────────────────────────

/// A feature read back from a GeoJSON file, not yet stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedFeature {
    pub title: String,
    pub description: String,
    pub kind: AnnotationKind,
    pub geometry: Geometry,
    /// Non-reserved properties, kept as-is.
    pub properties: JsonObject,
}

/// Result of parsing a FeatureCollection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub features: Vec<ImportedFeature>,
    /// Features with missing or unsupported geometry.
    pub skipped: usize,
}

/// Title given to imported features that carry none.
pub const UNTITLED: &str = "Untitled";

/// Parse a GeoJSON FeatureCollection. Point, LineString and Polygon
/// geometries are supported; anything else is skipped and counted.
pub fn from_geojson_str(text: &str) -> Result<ImportReport, ExportError> {
    let parsed: GeoJson = text.parse()?;
    let collection = match parsed {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(ExportError::NotFeatureCollection { found: "Feature" }),
        GeoJson::Geometry(_) => {
            return Err(ExportError::NotFeatureCollection { found: "Geometry" });
        }
    };

    let mut report = ImportReport::default();
    for feature in collection.features {
        match import_feature(feature) {
            Some(f) => report.features.push(f),
            None => report.skipped += 1,
        }
    }
    if report.skipped > 0 {
        log::warn!("import: skipped {} unsupported features", report.skipped);
    }
    Ok(report)
}

fn import_feature(feature: Feature) -> Option<ImportedFeature> {
    let props = feature.properties.unwrap_or_default();
    let text = |key: &str| props.get(key).and_then(JsonValue::as_str).map(str::to_string);

    let declared = text("type").map(|t| AnnotationKind::parse(&t));
    let radius = props
        .get("radius")
        .and_then(JsonValue::as_f64)
        .filter(|r| r.is_finite() && *r > 0.0);
    let value = feature.geometry?.value;

    let (natural, geometry) = match value {
        Value::Point(pos) => {
            let at = LatLng::from_position(&pos)?;
            match (declared, radius) {
                (Some(AnnotationKind::Circle), Some(radius_m)) => (
                    AnnotationKind::Circle,
                    Geometry::Circle {
                        center: at,
                        radius_m,
                    },
                ),
                _ => (AnnotationKind::Marker, Geometry::Point { at }),
            }
        }
        Value::LineString(line) => (
            AnnotationKind::Polyline,
            Geometry::LineString {
                points: positions(&line)?,
            },
        ),
        Value::Polygon(rings) => {
            let mut ring = positions(rings.first()?)?;
            if ring.len() > 1 && ring.first() == ring.last() {
                ring.pop();
            }
            (AnnotationKind::Polygon, Geometry::Polygon { ring })
        }
        _ => return None,
    };
    let kind = reconcile_kind(declared, natural);

    let title = text("title")
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());
    let description = text("description").unwrap_or_default();
    let properties = props
        .into_iter()
        .filter(|(k, _)| !RESERVED_PROPERTIES.contains(&k.as_str()))
        .collect();

    Some(ImportedFeature {
        title,
        description,
        kind,
        geometry,
        properties,
    })
}

/// The geometry decides the kind. A declared `type` survives only when it
/// agrees with the geometry, or when it is unrecognized.
fn reconcile_kind(declared: Option<AnnotationKind>, natural: AnnotationKind) -> AnnotationKind {
    match declared {
        None => natural,
        Some(AnnotationKind::Unknown) => AnnotationKind::Unknown,
        Some(kind) if kind == natural => kind,
        Some(kind) => {
            log::warn!("import: declared type {kind} does not match {natural} geometry");
            natural
        }
    }
}

fn positions(raw: &[Vec<f64>]) -> Option<Vec<LatLng>> {
    raw.iter().map(|p| LatLng::from_position(p)).collect()
}
