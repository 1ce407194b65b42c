//! In-memory `MapSurface` that records every call for assertions.

#![allow(dead_code)]

use mapnote_core::{Bounds, Geometry, LatLng, ShapeId, WidgetConfig};
use mapnote_editor::form::FormView;
use mapnote_editor::list::ListRow;
use mapnote_editor::{AnnotationApp, MapSurface, ShapeStyle, ToolKind};
use std::collections::HashMap;

#[derive(Debug)]
pub struct RecordingSurface {
    pub shapes: HashMap<ShapeId, (Geometry, ShapeStyle)>,
    pub popups: HashMap<ShapeId, String>,
    pub opened_popups: Vec<ShapeId>,
    pub fitted: Vec<Bounds>,
    pub active_tool: Option<ToolKind>,
    pub form: Option<FormView>,
    pub rows: Vec<ListRow>,
    pub measurement: Vec<LatLng>,
    pub measure_labels: Vec<(LatLng, String)>,
    pub measure_total: String,
    pub alerts: Vec<String>,
    pub confirms: Vec<String>,
    /// Answer returned by the next `confirm` calls.
    pub confirm_answer: bool,
    pub downloads: Vec<(String, String)>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self {
            shapes: HashMap::new(),
            popups: HashMap::new(),
            opened_popups: Vec::new(),
            fitted: Vec::new(),
            active_tool: None,
            form: None,
            rows: Vec::new(),
            measurement: Vec::new(),
            measure_labels: Vec::new(),
            measure_total: String::new(),
            alerts: Vec::new(),
            confirms: Vec::new(),
            confirm_answer: true,
            downloads: Vec::new(),
        }
    }
}

impl MapSurface for RecordingSurface {
    fn draw_shape(&mut self, shape: ShapeId, geometry: &Geometry, style: ShapeStyle) {
        self.shapes.insert(shape, (geometry.clone(), style));
    }

    fn remove_shape(&mut self, shape: ShapeId) {
        self.shapes.remove(&shape);
        self.popups.remove(&shape);
    }

    fn clear_shapes(&mut self) {
        self.shapes.clear();
        self.popups.clear();
    }

    fn bind_popup(&mut self, shape: ShapeId, html: &str) {
        self.popups.insert(shape, html.to_string());
    }

    fn open_popup(&mut self, shape: ShapeId) {
        self.opened_popups.push(shape);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.fitted.push(bounds);
    }

    fn set_active_tool(&mut self, tool: Option<ToolKind>) {
        self.active_tool = tool;
    }

    fn show_form(&mut self, form: Option<&FormView>) {
        self.form = form.cloned();
    }

    fn render_list(&mut self, rows: &[ListRow]) {
        self.rows = rows.to_vec();
    }

    fn draw_measurement(&mut self, points: &[LatLng]) {
        self.measurement = points.to_vec();
    }

    fn add_measure_label(&mut self, at: LatLng, text: &str) {
        self.measure_labels.push((at, text.to_string()));
    }

    fn set_measure_total(&mut self, text: &str) {
        self.measure_total = text.to_string();
    }

    fn clear_measurement(&mut self) {
        self.measurement.clear();
        self.measure_labels.clear();
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm_answer
    }

    fn download(&mut self, filename: &str, contents: &str) {
        self.downloads
            .push((filename.to_string(), contents.to_string()));
    }
}

pub fn make_app() -> AnnotationApp<RecordingSurface> {
    let _ = env_logger::builder().is_test(true).try_init();
    AnnotationApp::new(WidgetConfig::default(), RecordingSurface::default())
}
