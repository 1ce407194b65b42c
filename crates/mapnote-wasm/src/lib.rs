//! WASM bridge for Mapnote: exposes the annotation widget to the host page.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the map
//! library; it passes a glue object implementing the map surface calls and
//! forwards DOM events here.

mod surface;

use mapnote_core::export::to_geojson_string;
use mapnote_core::{AnnotationId, WidgetConfig};
use mapnote_editor::AnnotationApp;
use mapnote_editor::ToolKind;
use mapnote_editor::input::{MapEvent, Modifiers};
use mapnote_editor::list::RowAction;
use surface::JsSurface;
use wasm_bindgen::prelude::*;

/// The annotation widget as seen from JavaScript.
///
/// All interaction from the page goes through this struct; every call runs
/// to completion before the next event is delivered.
#[wasm_bindgen]
pub struct MapnoteWidget {
    app: AnnotationApp<JsSurface>,
}

#[wasm_bindgen]
impl MapnoteWidget {
    /// Create the widget. `config_json` may be empty for the defaults.
    /// Throws if the config is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(glue: JsValue, config_json: &str) -> Result<MapnoteWidget, JsValue> {
        console_error_panic_hook_setup();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("console logger already installed");
        }

        let mut config =
            WidgetConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        if config.id_seed.is_none() {
            config.id_seed = Some(js_sys::Date::now() as u64);
        }
        log::info!("mapnote widget ready");
        Ok(Self {
            app: AnnotationApp::new(config, JsSurface::new(glue)),
        })
    }

    /// Adjust console verbosity (`"error"` .. `"trace"`, or `"off"`).
    pub fn set_log_level(&self, name: &str) {
        log::set_max_level(level_filter(name));
    }

    /// Effective config as JSON, for the glue to build the map view.
    pub fn config_json(&self) -> String {
        self.app.config().to_json().unwrap_or_else(|e| {
            log::warn!("config_json: {e}");
            "{}".to_string()
        })
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Arm a tool by name. Returns `false` for unknown names.
    pub fn set_tool(&mut self, name: &str) -> bool {
        match ToolKind::from_name(name) {
            Some(tool) => {
                self.app.select_tool(tool);
                true
            }
            None => {
                log::warn!("set_tool: unknown tool {name:?}");
                false
            }
        }
    }

    /// Name of the armed tool, or empty string if none.
    pub fn get_tool_name(&self) -> String {
        self.app
            .controller()
            .active_tool()
            .map(|t| t.name().to_string())
            .unwrap_or_default()
    }

    // ─── Map events ──────────────────────────────────────────────────────

    pub fn handle_click(&mut self, lat: f64, lng: f64) -> bool {
        self.app.handle_event(MapEvent::click(lat, lng))
    }

    pub fn handle_move(&mut self, lat: f64, lng: f64) -> bool {
        self.app.handle_event(MapEvent::moved(lat, lng))
    }

    pub fn handle_double_click(&mut self, lat: f64, lng: f64) -> bool {
        self.app.handle_event(MapEvent::double_click(lat, lng))
    }

    /// Finish the polyline/polygon being drawn (toolbar "finish" button).
    pub fn finish_drawing(&mut self) -> bool {
        self.app.finish_drawing()
    }

    // ─── Form ────────────────────────────────────────────────────────────

    pub fn set_form_title(&mut self, title: &str) {
        self.app.set_form_title(title);
    }

    pub fn set_form_description(&mut self, description: &str) {
        self.app.set_form_description(description);
    }

    /// Save the form. Returns `{"ok":true,"id":N}` or `{"ok":false,"error":"..."}`.
    pub fn save_form(&mut self) -> String {
        match self.app.save_form() {
            Ok(id) => serde_json::json!({"ok": true, "id": id.0}).to_string(),
            Err(err) => error_json(&err),
        }
    }

    pub fn cancel(&mut self) {
        self.app.cancel();
    }

    /// Whether the title/description form is showing.
    pub fn is_form_open(&self) -> bool {
        self.app.form().is_open()
    }

    // ─── List ────────────────────────────────────────────────────────────

    /// Row click. Ids come from `renderList` rows.
    pub fn activate_row(&mut self, id: f64) -> bool {
        self.app.row_action(RowAction::Activate(annotation_id(id)))
    }

    /// Row edit control.
    pub fn edit_row(&mut self, id: f64) -> bool {
        self.app.row_action(RowAction::Edit(annotation_id(id)))
    }

    // ─── Data ────────────────────────────────────────────────────────────

    /// Clear everything after a confirm prompt. `false` if declined.
    pub fn clear_all(&mut self) -> bool {
        self.app.clear_all()
    }

    /// Download the store as GeoJSON. Returns `{"ok":true}` or an error.
    pub fn export(&mut self) -> String {
        match self.app.export() {
            Ok(_) => r#"{"ok":true}"#.to_string(),
            Err(err) => error_json(&err),
        }
    }

    /// The store as a GeoJSON FeatureCollection string, without downloading.
    pub fn get_annotations_json(&self) -> String {
        to_geojson_string(self.app.store()).unwrap_or_else(|e| {
            log::warn!("get_annotations_json: {e}");
            r#"{"type":"FeatureCollection","features":[]}"#.to_string()
        })
    }

    /// Append features from GeoJSON text.
    /// Returns `{"ok":true,"added":N}` or `{"ok":false,"error":"..."}`.
    pub fn load_geojson(&mut self, text: &str) -> String {
        match self.app.load_geojson(text) {
            Ok(added) => serde_json::json!({"ok": true, "added": added}).to_string(),
            Err(err) => error_json(&err),
        }
    }

    pub fn annotation_count(&self) -> usize {
        self.app.store().len()
    }

    /// Displayed measurement total (`"0"` when idle).
    pub fn get_measure_total(&self) -> String {
        self.app.measurement().total_text()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"handled":bool, "action":"<action_name>", "tool":"<tool_name>"}`
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> String {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let action = self.app.handle_key(key, mods);
        serde_json::json!({
            "handled": action.is_some(),
            "action": action.map_or("none", |a| a.name()),
            "tool": self.get_tool_name(),
        })
        .to_string()
    }
}

/// Validate a widget config without creating a widget.
/// Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_config(config_json: &str) -> String {
    match WidgetConfig::from_json(config_json) {
        Ok(_) => r#"{"ok":true}"#.to_string(),
        Err(err) => error_json(&err),
    }
}

fn error_json(err: &dyn std::fmt::Display) -> String {
    serde_json::json!({"ok": false, "error": err.to_string()}).to_string()
}

/// Unknown level names fall back to `Info`.
fn level_filter(name: &str) -> log::LevelFilter {
    name.parse().unwrap_or(log::LevelFilter::Info)
}

/// JS numbers carry ids up to 2^53 exactly, well past epoch-millisecond seeds.
fn annotation_id(id: f64) -> AnnotationId {
    AnnotationId(id as u64)
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Mapnote WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
