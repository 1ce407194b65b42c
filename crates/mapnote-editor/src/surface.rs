//! The map surface seam.
//!
//! Everything the widget needs from the host: shape rendering, view control,
//! popups, the form and list panels, blocking dialogs and file download.
//! The browser bridge implements it over the JS map library; tests implement
//! it with an in-memory recorder.

use crate::form::FormView;
use crate::list::ListRow;
use crate::tools::ToolKind;
use mapnote_core::{Bounds, Geometry, LatLng, ShapeId};

/// How a shape is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeStyle {
    /// Being drawn or awaiting the form.
    Draft,
    /// Backed by a stored annotation.
    Committed,
}

impl ShapeStyle {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeStyle::Draft => "draft",
            ShapeStyle::Committed => "committed",
        }
    }
}

pub trait MapSurface {
    /// Draw `shape`, replacing any existing shape with the same id.
    fn draw_shape(&mut self, shape: ShapeId, geometry: &Geometry, style: ShapeStyle);

    fn remove_shape(&mut self, shape: ShapeId);

    /// Remove every annotation shape from the drawing layer group.
    fn clear_shapes(&mut self);

    fn bind_popup(&mut self, shape: ShapeId, html: &str);

    fn open_popup(&mut self, shape: ShapeId);

    fn fit_bounds(&mut self, bounds: Bounds);

    /// Highlight exactly one toolbar button, or none.
    fn set_active_tool(&mut self, tool: Option<ToolKind>);

    /// Show the form with these values, or hide it.
    fn show_form(&mut self, form: Option<&FormView>);

    fn render_list(&mut self, rows: &[ListRow]);

    /// Redraw the measurement polyline over all points so far.
    fn draw_measurement(&mut self, points: &[LatLng]);

    fn add_measure_label(&mut self, at: LatLng, text: &str);

    fn set_measure_total(&mut self, text: &str);

    /// Remove the measurement polyline and every label.
    fn clear_measurement(&mut self);

    /// Blocking message box.
    fn alert(&mut self, message: &str);

    /// Blocking yes/no prompt.
    fn confirm(&mut self, message: &str) -> bool;

    /// Offer `contents` as a file download.
    fn download(&mut self, filename: &str, contents: &str);
}
