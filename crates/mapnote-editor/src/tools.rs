//! Drawing tools.
//!
//! Each tool turns map events into draft geometry. A tool reports a
//! `ToolEffect::Preview` while the shape is still being placed and
//! `ToolEffect::Complete` once it is ready for the annotation form.
//!
//! | Tool     | Starts on    | Completes on                                |
//! |----------|--------------|---------------------------------------------|
//! | Marker   | click        | same click                                  |
//! | Polyline | first click  | double click / finish, ≥ 2 vertices         |
//! | Polygon  | first click  | double click / finish, ≥ 3 vertices         |
//! | Circle   | click center | second click, radius > 0                    |
//! | Measure  | (routed to the measurement session, never drafts)          |

use crate::input::MapEvent;
use mapnote_core::geo::haversine_distance;
use mapnote_core::{AnnotationKind, Geometry, LatLng};
use smallvec::SmallVec;

/// The drawing modes offered by the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Marker,
    Polygon,
    Polyline,
    Circle,
    Measure,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::Marker,
        ToolKind::Polygon,
        ToolKind::Polyline,
        ToolKind::Circle,
        ToolKind::Measure,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Marker => "marker",
            ToolKind::Polygon => "polygon",
            ToolKind::Polyline => "polyline",
            ToolKind::Circle => "circle",
            ToolKind::Measure => "measure",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Annotation kind produced by this tool; `None` for measuring.
    pub fn annotation_kind(&self) -> Option<AnnotationKind> {
        match self {
            ToolKind::Marker => Some(AnnotationKind::Marker),
            ToolKind::Polygon => Some(AnnotationKind::Polygon),
            ToolKind::Polyline => Some(AnnotationKind::Polyline),
            ToolKind::Circle => Some(AnnotationKind::Circle),
            ToolKind::Measure => None,
        }
    }
}

/// What a tool did with an event.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEffect {
    /// Event ignored.
    None,
    /// Shape in progress; redraw the draft with this geometry.
    Preview(Geometry),
    /// Shape finished.
    Complete(Geometry),
}

/// Trait for tools that turn map events into draft geometry.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle a map event.
    fn handle(&mut self, event: &MapEvent) -> ToolEffect;

    /// Explicit "finish" (toolbar button or Enter key).
    fn finish(&mut self) -> ToolEffect {
        ToolEffect::None
    }

    /// Drop any in-progress state.
    fn reset(&mut self);
}

// ─── Marker Tool ─────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MarkerTool;

impl MarkerTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for MarkerTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Marker
    }

    fn handle(&mut self, event: &MapEvent) -> ToolEffect {
        match event {
            MapEvent::Click { at } => ToolEffect::Complete(Geometry::Point { at: *at }),
            _ => ToolEffect::None,
        }
    }

    fn reset(&mut self) {}
}

// ─── Vertex Tool (polyline + polygon) ────────────────────────────────────

/// Click-to-add-vertex tool shared by polylines and polygons.
pub struct VertexTool {
    kind: ToolKind,
    min_vertices: usize,
    vertices: SmallVec<[LatLng; 8]>,
}

impl VertexTool {
    pub fn polyline() -> Self {
        Self {
            kind: ToolKind::Polyline,
            min_vertices: 2,
            vertices: SmallVec::new(),
        }
    }

    pub fn polygon() -> Self {
        Self {
            kind: ToolKind::Polygon,
            min_vertices: 3,
            vertices: SmallVec::new(),
        }
    }

    pub fn vertices(&self) -> &[LatLng] {
        &self.vertices
    }

    fn geometry(&self, cursor: Option<LatLng>) -> Geometry {
        let mut points: Vec<LatLng> = self.vertices.to_vec();
        points.extend(cursor);
        match self.kind {
            ToolKind::Polygon => Geometry::Polygon { ring: points },
            _ => Geometry::LineString { points },
        }
    }

    /// Add a vertex unless it repeats the last one (a double click also
    /// delivers two clicks at the same spot).
    fn push(&mut self, at: LatLng) -> bool {
        if self.vertices.last() == Some(&at) {
            return false;
        }
        self.vertices.push(at);
        true
    }

    fn complete(&mut self) -> ToolEffect {
        if self.vertices.len() < self.min_vertices {
            return ToolEffect::None;
        }
        let geometry = self.geometry(None);
        self.vertices.clear();
        ToolEffect::Complete(geometry)
    }
}

impl Tool for VertexTool {
    fn kind(&self) -> ToolKind {
        self.kind
    }

    fn handle(&mut self, event: &MapEvent) -> ToolEffect {
        match event {
            MapEvent::Click { at } => {
                if self.push(*at) {
                    ToolEffect::Preview(self.geometry(None))
                } else {
                    ToolEffect::None
                }
            }
            MapEvent::Move { at } => {
                if self.vertices.is_empty() {
                    ToolEffect::None
                } else {
                    ToolEffect::Preview(self.geometry(Some(*at)))
                }
            }
            MapEvent::DoubleClick { at } => {
                if self.vertices.is_empty() {
                    return ToolEffect::None;
                }
                self.push(*at);
                self.complete()
            }
        }
    }

    fn finish(&mut self) -> ToolEffect {
        self.complete()
    }

    fn reset(&mut self) {
        self.vertices.clear();
    }
}

// ─── Circle Tool ─────────────────────────────────────────────────────────

pub struct CircleTool {
    center: Option<LatLng>,
    earth_radius_m: f64,
}

impl CircleTool {
    pub fn new(earth_radius_m: f64) -> Self {
        Self {
            center: None,
            earth_radius_m,
        }
    }

    fn circle(&self, center: LatLng, edge: LatLng) -> Geometry {
        Geometry::Circle {
            center,
            radius_m: haversine_distance(center, edge, self.earth_radius_m),
        }
    }
}

impl Tool for CircleTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Circle
    }

    fn handle(&mut self, event: &MapEvent) -> ToolEffect {
        match (event, self.center) {
            (MapEvent::Click { at }, None) => {
                self.center = Some(*at);
                ToolEffect::Preview(Geometry::Circle {
                    center: *at,
                    radius_m: 0.0,
                })
            }
            (MapEvent::Move { at }, Some(center)) => ToolEffect::Preview(self.circle(center, *at)),
            (MapEvent::Click { at } | MapEvent::DoubleClick { at }, Some(center)) => {
                let geometry = self.circle(center, *at);
                match geometry {
                    Geometry::Circle { radius_m, .. } if radius_m > 0.0 => {
                        self.center = None;
                        ToolEffect::Complete(geometry)
                    }
                    _ => ToolEffect::None,
                }
            }
            _ => ToolEffect::None,
        }
    }

    fn reset(&mut self) {
        self.center = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapnote_core::EARTH_RADIUS_M;

    #[test]
    fn tool_names_roundtrip() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(tool.name()), Some(tool));
        }
        assert_eq!(ToolKind::from_name("rectangle"), None);
        assert_eq!(ToolKind::Measure.annotation_kind(), None);
    }

    #[test]
    fn marker_completes_on_click() {
        let mut tool = MarkerTool::new();
        assert_eq!(tool.handle(&MapEvent::moved(1.0, 1.0)), ToolEffect::None);
        assert_eq!(
            tool.handle(&MapEvent::click(1.0, 2.0)),
            ToolEffect::Complete(Geometry::Point {
                at: LatLng::new(1.0, 2.0)
            })
        );
    }

    #[test]
    fn polyline_previews_rubber_band_then_finishes() {
        let mut tool = VertexTool::polyline();
        assert_eq!(tool.handle(&MapEvent::moved(0.0, 0.0)), ToolEffect::None);
        tool.handle(&MapEvent::click(0.0, 0.0));
        let preview = tool.handle(&MapEvent::moved(0.0, 0.5));
        assert_eq!(
            preview,
            ToolEffect::Preview(Geometry::LineString {
                points: vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 0.5)]
            })
        );
        // One vertex is not enough.
        assert_eq!(tool.finish(), ToolEffect::None);
        tool.handle(&MapEvent::click(0.0, 1.0));
        match tool.finish() {
            ToolEffect::Complete(Geometry::LineString { points }) => assert_eq!(points.len(), 2),
            other => panic!("expected completed line, got {other:?}"),
        }
        assert!(tool.vertices().is_empty());
    }

    #[test]
    fn double_click_does_not_duplicate_last_vertex() {
        let mut tool = VertexTool::polygon();
        tool.handle(&MapEvent::click(0.0, 0.0));
        tool.handle(&MapEvent::click(0.0, 1.0));
        tool.handle(&MapEvent::click(1.0, 1.0));
        // Browser delivers click, click, dblclick at the final spot.
        tool.handle(&MapEvent::click(1.0, 0.0));
        tool.handle(&MapEvent::click(1.0, 0.0));
        match tool.handle(&MapEvent::double_click(1.0, 0.0)) {
            ToolEffect::Complete(Geometry::Polygon { ring }) => assert_eq!(ring.len(), 4),
            other => panic!("expected completed polygon, got {other:?}"),
        }
    }

    #[test]
    fn polygon_needs_three_vertices() {
        let mut tool = VertexTool::polygon();
        tool.handle(&MapEvent::click(0.0, 0.0));
        tool.handle(&MapEvent::click(0.0, 1.0));
        assert_eq!(tool.finish(), ToolEffect::None);
        assert_eq!(tool.vertices().len(), 2);
    }

    #[test]
    fn circle_radius_follows_cursor() {
        let mut tool = CircleTool::new(EARTH_RADIUS_M);
        tool.handle(&MapEvent::click(0.0, 0.0));
        match tool.handle(&MapEvent::moved(0.0, 1.0)) {
            ToolEffect::Preview(Geometry::Circle { radius_m, .. }) => {
                assert!((radius_m - 111_194.93).abs() < 0.01)
            }
            other => panic!("expected circle preview, got {other:?}"),
        }
        // Clicking the center again does not complete a zero-radius circle.
        assert_eq!(tool.handle(&MapEvent::click(0.0, 0.0)), ToolEffect::None);
        assert!(matches!(
            tool.handle(&MapEvent::click(0.0, 1.0)),
            ToolEffect::Complete(Geometry::Circle { .. })
        ));
    }
}
