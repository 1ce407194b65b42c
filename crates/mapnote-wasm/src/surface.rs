//! `MapSurface` over a JS glue object.
//!
//! The host page passes an object whose methods mirror the trait in
//! camelCase (`drawShape`, `removeShape`, `showForm`, ...). Shape ids are
//! passed as strings and geometry/list/form payloads as plain JS objects.
//! Blocking dialogs and the download go straight to the browser window.

use mapnote_core::{Bounds, Geometry, LatLng, ShapeId};
use mapnote_editor::form::FormView;
use mapnote_editor::list::ListRow;
use mapnote_editor::{MapSurface, ShapeStyle, ToolKind};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Media type prefix of the exported data URI.
const DATA_URI_PREFIX: &str = "data:text/json;charset=utf-8,";

pub struct JsSurface {
    glue: JsValue,
}

impl JsSurface {
    pub fn new(glue: JsValue) -> Self {
        Self { glue }
    }

    /// Call `glue[method](...args)`. A missing method or a JS exception is
    /// logged and reported as `None`.
    fn call(&self, method: &str, args: &[JsValue]) -> Option<JsValue> {
        let func = match js_sys::Reflect::get(&self.glue, &JsValue::from_str(method)) {
            Ok(value) => match value.dyn_into::<js_sys::Function>() {
                Ok(func) => func,
                Err(_) => {
                    log::warn!("glue.{method} is not a function");
                    return None;
                }
            },
            Err(err) => {
                log::warn!("glue.{method}: {err:?}");
                return None;
            }
        };
        let args: js_sys::Array = args.iter().collect();
        match func.apply(&self.glue, &args) {
            Ok(value) => Some(value),
            Err(err) => {
                log::error!("glue.{method} threw: {err:?}");
                None
            }
        }
    }
}

/// Serialize to a plain JS object via JSON.
fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    let parsed = serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&e.to_string()))
        .and_then(|json| js_sys::JSON::parse(&json));
    match parsed {
        Ok(value) => value,
        Err(err) => {
            log::warn!("to_js: {err:?}");
            JsValue::NULL
        }
    }
}

fn shape_arg(shape: ShapeId) -> JsValue {
    JsValue::from_str(shape.as_str())
}

pub(crate) fn form_json(form: &FormView) -> serde_json::Value {
    serde_json::json!({
        "title": form.title,
        "description": form.description,
        "editing": form.editing,
    })
}

pub(crate) fn rows_json(rows: &[ListRow]) -> serde_json::Value {
    rows.iter()
        .map(|row| {
            serde_json::json!({
                "id": row.id.0,
                "shape": row.shape.as_str(),
                "title": row.title,
                "type": row.kind_label,
            })
        })
        .collect()
}

pub(crate) fn bounds_json(bounds: &Bounds) -> serde_json::Value {
    serde_json::json!([
        [bounds.south_west.lat, bounds.south_west.lng],
        [bounds.north_east.lat, bounds.north_east.lng],
    ])
}

impl MapSurface for JsSurface {
    fn draw_shape(&mut self, shape: ShapeId, geometry: &Geometry, style: ShapeStyle) {
        self.call(
            "drawShape",
            &[shape_arg(shape), to_js(geometry), JsValue::from_str(style.name())],
        );
    }

    fn remove_shape(&mut self, shape: ShapeId) {
        self.call("removeShape", &[shape_arg(shape)]);
    }

    fn clear_shapes(&mut self) {
        self.call("clearShapes", &[]);
    }

    fn bind_popup(&mut self, shape: ShapeId, html: &str) {
        self.call("bindPopup", &[shape_arg(shape), JsValue::from_str(html)]);
    }

    fn open_popup(&mut self, shape: ShapeId) {
        self.call("openPopup", &[shape_arg(shape)]);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.call("fitBounds", &[to_js(&bounds_json(&bounds))]);
    }

    fn set_active_tool(&mut self, tool: Option<ToolKind>) {
        let arg = tool.map_or(JsValue::NULL, |t| JsValue::from_str(t.name()));
        self.call("setActiveTool", &[arg]);
    }

    fn show_form(&mut self, form: Option<&FormView>) {
        let arg = form.map_or(JsValue::NULL, |f| to_js(&form_json(f)));
        self.call("showForm", &[arg]);
    }

    fn render_list(&mut self, rows: &[ListRow]) {
        self.call("renderList", &[to_js(&rows_json(rows))]);
    }

    fn draw_measurement(&mut self, points: &[LatLng]) {
        self.call("drawMeasurement", &[to_js(points)]);
    }

    fn add_measure_label(&mut self, at: LatLng, text: &str) {
        self.call("addMeasureLabel", &[to_js(&at), JsValue::from_str(text)]);
    }

    fn set_measure_total(&mut self, text: &str) {
        self.call("setMeasureTotal", &[JsValue::from_str(text)]);
    }

    fn clear_measurement(&mut self) {
        self.call("clearMeasurement", &[]);
    }

    fn alert(&mut self, message: &str) {
        let Some(window) = web_sys::window() else {
            log::warn!("alert without window: {message}");
            return;
        };
        if let Err(err) = window.alert_with_message(message) {
            log::warn!("alert failed: {err:?}");
        }
    }

    fn confirm(&mut self, message: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        window.confirm_with_message(message).unwrap_or_else(|err| {
            log::warn!("confirm failed: {err:?}");
            false
        })
    }

    fn download(&mut self, filename: &str, contents: &str) {
        if let Err(err) = trigger_download(filename, contents) {
            log::error!("download of {filename} failed: {err:?}");
        }
    }
}

/// Click a temporary `<a download>` pointing at a data URI.
fn trigger_download(filename: &str, contents: &str) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no document body"))?;

    let encoded = String::from(js_sys::encode_uri_component(contents));
    let anchor: web_sys::HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&format!("{DATA_URI_PREFIX}{encoded}"));
    anchor.set_download(filename);

    body.append_child(&anchor)?;
    anchor.click();
    anchor.remove();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapnote_core::AnnotationId;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_serialize_for_the_list_panel() {
        let rows = vec![ListRow {
            id: AnnotationId(7),
            shape: ShapeId::intern("marker_1"),
            title: "Home".to_string(),
            kind_label: "marker",
        }];
        assert_eq!(
            rows_json(&rows),
            serde_json::json!([{"id": 7, "shape": "marker_1", "title": "Home", "type": "marker"}])
        );
    }

    #[test]
    fn bounds_serialize_as_corner_pairs() {
        let b = Bounds::from_points(&[LatLng::new(1.0, 2.0), LatLng::new(3.0, 4.0)]).unwrap();
        assert_eq!(bounds_json(&b), serde_json::json!([[1.0, 2.0], [3.0, 4.0]]));
    }

    #[test]
    fn form_serializes_edit_flag() {
        let form = FormView {
            title: "A".to_string(),
            description: String::new(),
            editing: true,
        };
        assert_eq!(
            form_json(&form),
            serde_json::json!({"title": "A", "description": "", "editing": true})
        );
    }
}
