//! Annotation data model.
//!
//! An `Annotation` is a titled geographic feature. Its geometry is kept in a
//! typed form (`Geometry`) and only converted to GeoJSON at the export
//! boundary. The annotation kind is carried explicitly from the moment the
//! draft shape is created; it is never inferred from the geometry.

use crate::geo::{Bounds, EARTH_RADIUS_M};
use crate::id::{AnnotationId, ShapeId};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Coordinates ─────────────────────────────────────────────────────────

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// GeoJSON position order: `[lng, lat]`.
    pub fn to_position(self) -> Vec<f64> {
        vec![self.lng, self.lat]
    }

    /// Parse a GeoJSON position. Extra elements (altitude) are ignored.
    pub fn from_position(pos: &[f64]) -> Option<Self> {
        match pos {
            [lng, lat, ..] => Some(Self::new(*lat, *lng)),
            _ => None,
        }
    }
}

// ─── Kind ────────────────────────────────────────────────────────────────

/// Explicit classification of an annotation, exported as the `type` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Marker,
    Polygon,
    Polyline,
    Circle,
    /// Imported feature whose `type` property was missing or unrecognized.
    Unknown,
}

impl AnnotationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Marker => "marker",
            AnnotationKind::Polygon => "polygon",
            AnnotationKind::Polyline => "polyline",
            AnnotationKind::Circle => "circle",
            AnnotationKind::Unknown => "unknown",
        }
    }

    /// Lenient parse used on import: anything unrecognized is `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "marker" => AnnotationKind::Marker,
            "polygon" => AnnotationKind::Polygon,
            "polyline" => AnnotationKind::Polyline,
            "circle" => AnnotationKind::Circle,
            _ => AnnotationKind::Unknown,
        }
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Shape geometry in map coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Geometry {
    Point { at: LatLng },
    LineString { points: Vec<LatLng> },
    /// Open ring: the closing vertex is added on export.
    Polygon { ring: Vec<LatLng> },
    Circle { center: LatLng, radius_m: f64 },
}

impl Geometry {
    /// Bounding box used when fitting the map view to an annotation.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Geometry::Point { at } => Some(Bounds::of_point(*at)),
            Geometry::LineString { points } => Bounds::from_points(points),
            Geometry::Polygon { ring } => Bounds::from_points(ring),
            Geometry::Circle { center, radius_m } => {
                Some(Bounds::of_circle(*center, *radius_m, EARTH_RADIUS_M))
            }
        }
    }

    /// Number of vertices (a circle counts its center).
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Point { .. } | Geometry::Circle { .. } => 1,
            Geometry::LineString { points } => points.len(),
            Geometry::Polygon { ring } => ring.len(),
        }
    }
}

// ─── Annotation ──────────────────────────────────────────────────────────

/// A user-created labeled geographic feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: AnnotationId,
    pub title: String,
    pub description: String,
    pub kind: AnnotationKind,
    pub geometry: Geometry,
    /// Free-form properties. Unused by the widget, preserved on import.
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// The rendered shape this annotation is drawn as.
    pub shape: ShapeId,
}

impl Annotation {
    pub fn new(
        id: AnnotationId,
        title: impl Into<String>,
        description: impl Into<String>,
        kind: AnnotationKind,
        geometry: Geometry,
        shape: ShapeId,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            kind,
            geometry,
            properties: serde_json::Map::new(),
            shape,
        }
    }

    /// Popup body shown when the shape is clicked: bold title, line break,
    /// description. Both parts are HTML-escaped.
    pub fn popup_html(&self) -> String {
        format!(
            "<b>{}</b><br>{}",
            escape_html(&self.title),
            escape_html(&self.description)
        )
    }
}

/// Fields replaced by an in-place update. Id, kind, shape and position in the
/// store are preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationFields {
    pub title: String,
    pub description: String,
    pub geometry: Geometry,
}

/// Returns `true` when no title was entered. Whitespace counts as a title.
pub fn is_missing_title(title: &str) -> bool {
    title.is_empty()
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
