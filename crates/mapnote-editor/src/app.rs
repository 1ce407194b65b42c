//! The annotation application controller.
//!
//! `AnnotationApp` owns all mutable widget state (store, tool controller,
//! form, measurement session) plus the map surface it renders to. Every
//! user interaction enters through one `&mut self` method and runs to
//! completion before the next.

use crate::controller::{ControllerOutput, DraftShape, ToolController};
use crate::form::{FormError, FormWorkflow};
use crate::input::{MapEvent, Modifiers};
use crate::list::{self, RowAction};
use crate::measure::MeasurementSession;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::surface::{MapSurface, ShapeStyle};
use crate::tools::ToolKind;
use mapnote_core::export::{from_geojson_str, to_geojson_string};
use mapnote_core::{
    Annotation, AnnotationId, AnnotationStore, ExportError, LatLng, ShapeId, StoreError,
    WidgetConfig,
};

/// Prompt shown before clearing every annotation.
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear all annotations?";

pub struct AnnotationApp<S: MapSurface> {
    config: WidgetConfig,
    store: AnnotationStore,
    controller: ToolController,
    form: FormWorkflow,
    measurement: MeasurementSession,
    surface: S,
}

impl<S: MapSurface> AnnotationApp<S> {
    /// Create the app and paint the initial (empty) panels.
    pub fn new(config: WidgetConfig, surface: S) -> Self {
        let mut app = Self {
            store: AnnotationStore::with_id_seed(config.id_seed.unwrap_or(1)),
            controller: ToolController::new(config.earth_radius_m),
            form: FormWorkflow::new(),
            measurement: MeasurementSession::new(config.earth_radius_m, config.distance_decimals),
            config,
            surface,
        };
        app.surface.set_active_tool(None);
        app.surface.show_form(None);
        app.surface.set_measure_total(&app.measurement.total_text());
        app.refresh_list();
        app
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn controller(&self) -> &ToolController {
        &self.controller
    }

    pub fn form(&self) -> &FormWorkflow {
        &self.form
    }

    pub fn measurement(&self) -> &MeasurementSession {
        &self.measurement
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Arm a drawing tool. Resets an active measurement and drops any
    /// unsaved draft or open form first.
    pub fn select_tool(&mut self, tool: ToolKind) {
        if self.measurement.is_active() {
            self.reset_measurement();
        }
        self.drop_draft();
        self.controller.select_tool(tool);
        self.surface.set_active_tool(Some(tool));
    }

    /// Route a map event. Returns `true` if anything was redrawn.
    pub fn handle_event(&mut self, event: MapEvent) -> bool {
        let output = self.controller.handle_event(&event);
        self.apply_output(output)
    }

    /// Finish the polyline/polygon in progress.
    pub fn finish_drawing(&mut self) -> bool {
        let output = self.controller.finish();
        self.apply_output(output)
    }

    // ─── Form ────────────────────────────────────────────────────────────

    pub fn set_form_title(&mut self, title: &str) {
        self.form.set_title(title);
    }

    pub fn set_form_description(&mut self, description: &str) {
        self.form.set_description(description);
    }

    /// Save the open form. A missing title is reported to the user and the
    /// form stays open.
    pub fn save_form(&mut self) -> Result<AnnotationId, FormError> {
        match self.form.save(&mut self.store) {
            Ok(outcome) => {
                let annotation = outcome.annotation;
                self.controller.take_draft();
                self.surface.draw_shape(
                    annotation.shape,
                    &annotation.geometry,
                    ShapeStyle::Committed,
                );
                self.surface.bind_popup(annotation.shape, &annotation.popup_html());
                self.close_form();
                self.refresh_list();
                log::info!(
                    "{} {} annotation {} \"{}\"",
                    if outcome.created { "created" } else { "updated" },
                    annotation.kind,
                    annotation.id,
                    annotation.title
                );
                Ok(annotation.id)
            }
            Err(err @ FormError::MissingTitle) => {
                self.surface.alert(&err.to_string());
                Err(err)
            }
            Err(err @ FormError::Store(StoreError::NotFound(id))) => {
                log::warn!("save: annotation {id} vanished while editing");
                self.controller.take_draft();
                self.close_form();
                Err(err)
            }
            Err(err) => {
                log::warn!("save failed: {err}");
                Err(err)
            }
        }
    }

    /// Close the form without saving, or abandon the drawing in progress.
    pub fn cancel(&mut self) {
        self.drop_draft();
        self.close_form();
    }

    // ─── List ────────────────────────────────────────────────────────────

    /// Row click: fit the map to the annotation and open its popup.
    /// Returns `false` (and does nothing) if the annotation is gone.
    pub fn activate_row(&mut self, id: AnnotationId) -> bool {
        let Some(annotation) = self.store.get(id) else {
            log::debug!("activate_row: {id} not found");
            return false;
        };
        let shape = annotation.shape;
        if let Some(bounds) = annotation.geometry.bounds() {
            self.surface.fit_bounds(bounds);
        }
        self.surface.open_popup(shape);
        true
    }

    /// Row edit control: open the form pre-filled for this annotation.
    pub fn edit_row(&mut self, id: AnnotationId) -> bool {
        let Some(annotation) = self.store.get(id).cloned() else {
            log::debug!("edit_row: {id} not found");
            return false;
        };
        self.drop_draft();
        self.surface.set_active_tool(None);
        self.form.open_edit(&annotation);
        self.surface.show_form(self.form.view().as_ref());
        true
    }

    /// Dispatch a list row interaction.
    pub fn row_action(&mut self, action: RowAction) -> bool {
        match action {
            RowAction::Activate(id) => self.activate_row(id),
            RowAction::Edit(id) => self.edit_row(id),
        }
    }

    // ─── Store-wide operations ───────────────────────────────────────────

    /// Clear every annotation after confirmation. Returns `false` if the
    /// user declined; nothing changes in that case.
    pub fn clear_all(&mut self) -> bool {
        if !self.surface.confirm(CLEAR_PROMPT) {
            return false;
        }
        self.drop_draft();
        self.close_form();
        let removed = self.store.clear();
        self.surface.clear_shapes();
        self.refresh_list();
        log::info!("cleared {} annotations", removed.len());
        true
    }

    /// Serialize the store as GeoJSON and offer it as a download.
    pub fn export(&mut self) -> Result<String, ExportError> {
        let json = to_geojson_string(&self.store)?;
        self.surface.download(&self.config.export_filename, &json);
        log::info!("exported {} annotations", self.store.len());
        Ok(json)
    }

    /// Load a GeoJSON FeatureCollection, appending its features as new
    /// annotations. Returns how many were added.
    pub fn load_geojson(&mut self, text: &str) -> Result<usize, ExportError> {
        let report = from_geojson_str(text)?;
        let mut added = 0;
        for feature in report.features {
            let id = self.store.next_id();
            let mut annotation = Annotation::new(
                id,
                feature.title,
                feature.description,
                feature.kind,
                feature.geometry,
                ShapeId::mint(feature.kind),
            );
            annotation.properties = feature.properties;
            let (shape, geometry, popup) = (
                annotation.shape,
                annotation.geometry.clone(),
                annotation.popup_html(),
            );
            match self.store.add(annotation) {
                Ok(_) => {
                    self.surface.draw_shape(shape, &geometry, ShapeStyle::Committed);
                    self.surface.bind_popup(shape, &popup);
                    added += 1;
                }
                Err(err) => log::warn!("load: skipping feature: {err}"),
            }
        }
        self.refresh_list();
        log::info!("loaded {added} annotations ({} skipped)", report.skipped);
        Ok(added)
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve and dispatch a key press. While the form is open only Enter
    /// (save) and Escape (cancel) are handled so typing is not hijacked.
    pub fn handle_key(&mut self, key: &str, mods: Modifiers) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, mods)?;
        if self.form.is_open() {
            match action {
                ShortcutAction::FinishDrawing => {
                    let _ = self.save_form();
                }
                ShortcutAction::Cancel => self.cancel(),
                _ => return None,
            }
            return Some(action);
        }
        match action {
            ShortcutAction::Tool(tool) => self.select_tool(tool),
            ShortcutAction::FinishDrawing => {
                self.finish_drawing();
            }
            ShortcutAction::Cancel => self.cancel(),
            ShortcutAction::Export => {
                if let Err(err) = self.export() {
                    log::warn!("export failed: {err}");
                }
            }
            ShortcutAction::ClearAll => {
                self.clear_all();
            }
        }
        Some(action)
    }

    // ─── Private helpers ─────────────────────────────────────────────────

    fn apply_output(&mut self, output: ControllerOutput) -> bool {
        match output {
            ControllerOutput::Ignored => false,
            ControllerOutput::Measure(at) => {
                self.add_measure_point(at);
                true
            }
            ControllerOutput::DraftChanged(draft) => {
                self.draw_draft(&draft);
                true
            }
            ControllerOutput::DraftCompleted(draft) => {
                self.draw_draft(&draft);
                self.form.open_create(draft);
                self.surface.show_form(self.form.view().as_ref());
                true
            }
        }
    }

    fn draw_draft(&mut self, draft: &DraftShape) {
        self.surface.draw_shape(draft.shape, &draft.geometry, ShapeStyle::Draft);
    }

    /// Cancel the open form and any draft, removing a newly drawn shape from
    /// the map. An edited pre-existing shape is left alone.
    fn drop_draft(&mut self) {
        let discarded = self.form.cancel().discard;
        let abandoned = self.controller.abort().map(|d| d.shape);
        if let Some(shape) = discarded {
            self.surface.remove_shape(shape);
        }
        if let Some(shape) = abandoned
            && Some(shape) != discarded
        {
            self.surface.remove_shape(shape);
        }
    }

    fn close_form(&mut self) {
        self.surface.show_form(None);
        self.surface.set_active_tool(self.controller.active_tool());
    }

    fn add_measure_point(&mut self, at: LatLng) {
        let step = self.measurement.add_point(at);
        self.surface.draw_measurement(self.measurement.points());
        if let Some(label) = &step.label {
            self.surface.add_measure_label(label.position, &label.text);
        }
        self.surface.set_measure_total(&self.measurement.total_text());
    }

    fn reset_measurement(&mut self) {
        self.measurement.reset();
        self.surface.clear_measurement();
        self.surface.set_measure_total(&self.measurement.total_text());
    }

    fn refresh_list(&mut self) {
        let rows = list::render(&self.store);
        self.surface.render_list(&rows);
    }
}
