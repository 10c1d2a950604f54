use crate::error;
use crate::interop::{arr_str, point, to_js};
use crate::Viewer;
use floorplan::{FloorId, MarkerMode, Point, Size, ViewerConfig};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// `undefined`/`null` mean the defaults; missing fields are defaulted too.
pub(crate) fn config_from_js(v: JsValue) -> Result<ViewerConfig, JsValue> {
    if v.is_undefined() || v.is_null() {
        return Ok(ViewerConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(v)?)
}

/// First non-finite parameter, as an error envelope.
pub(crate) fn check_finite(params: &[(&str, f64)]) -> Option<JsValue> {
    params.iter().find(|(_, v)| !v.is_finite()).map(|(name, _)| error::non_finite(name))
}

#[wasm_bindgen]
impl Viewer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Viewer, JsValue> {
        Viewer::rs_new(ViewerConfig::default()).map_err(error::to_js_error)
    }
    pub fn with_config(config: JsValue) -> Result<Viewer, JsValue> {
        Viewer::rs_new(config_from_js(config)?).map_err(error::to_js_error)
    }
    pub fn config(&self) -> JsValue {
        to_js(self.inner.config())
    }

    // Floors
    pub fn floor(&self) -> String {
        self.inner.floor().to_string()
    }
    pub fn floor_label(&self) -> String {
        self.inner.floor_label().to_string()
    }
    pub fn floors(&self) -> JsValue {
        to_js(&self.inner.registry().floors().collect::<Vec<_>>())
    }
    pub fn switch_floor(&mut self, id: &str) -> bool {
        self.inner.switch_floor(&FloorId::new(id)).is_ok()
    }
    pub fn switch_floor_res(&mut self, id: &str) -> JsValue {
        error::res(self.inner.switch_floor(&FloorId::new(id)), |_| JsValue::from_str(id))
    }

    // Image geometry
    pub fn set_image_size(&mut self, natural_w: f64, natural_h: f64, display_w: f64, display_h: f64) -> bool {
        self.inner
            .set_image_size(Size::new(natural_w, natural_h), Size::new(display_w, display_h))
            .is_ok()
    }
    pub fn set_image_size_res(&mut self, natural_w: f64, natural_h: f64, display_w: f64, display_h: f64) -> JsValue {
        if let Some(e) = check_finite(&[
            ("natural_w", natural_w),
            ("natural_h", natural_h),
            ("display_w", display_w),
            ("display_h", display_h),
        ]) {
            return e;
        }
        let r = self
            .inner
            .set_image_size(Size::new(natural_w, natural_h), Size::new(display_w, display_h));
        error::res(r, |s| to_js(&s))
    }
    pub fn scale(&self) -> JsValue {
        self.inner.scale().map_or(JsValue::NULL, |s| to_js(&s))
    }
    pub fn zoom(&self) -> f64 {
        self.inner.zoom()
    }
    pub fn zoom_percent(&self) -> u32 {
        self.inner.zoom_percent()
    }
    pub fn set_zoom(&mut self, z: f64) -> f64 {
        self.inner.set_zoom(z)
    }
    pub fn set_zoom_res(&mut self, z: f64) -> JsValue {
        if !z.is_finite() {
            return error::non_finite("z");
        }
        error::ok(JsValue::from_f64(self.inner.set_zoom(z)))
    }
    pub fn zoom_in(&mut self) -> f64 {
        self.inner.zoom_in()
    }
    pub fn zoom_out(&mut self) -> f64 {
        self.inner.zoom_out()
    }

    // Room list
    pub fn filter(&mut self, query: &str) -> u32 {
        self.inner.filter(query) as u32
    }
    pub fn query(&self) -> String {
        self.inner.query().to_string()
    }
    /// Names of the filtered rooms in list order.
    pub fn room_names(&self) -> js_sys::Array {
        arr_str(self.inner.filtered_rooms().iter().map(|r| r.name.as_str()))
    }
    pub fn select(&mut self, name: &str) -> bool {
        self.inner.select(name).is_ok()
    }
    pub fn select_res(&mut self, name: &str) -> JsValue {
        error::res(self.inner.select(name).map(|r| to_js(r)), |v| v)
    }
    pub fn selected_room(&self) -> JsValue {
        self.inner.selected_room().map_or(JsValue::NULL, |r| to_js(r))
    }
    pub fn clear_selection(&mut self) {
        self.inner.clear_selection()
    }
    pub fn navigate(&mut self, direction: i32) -> Option<String> {
        self.inner.navigate(direction)
    }
    pub fn show_all(&mut self) {
        self.inner.show_all()
    }
    pub fn hide_all(&mut self) {
        self.inner.hide_all()
    }
    pub fn mode(&self) -> String {
        match self.inner.mode() {
            MarkerMode::All => "all",
            MarkerMode::Selected => "selected",
            MarkerMode::Hidden => "hidden",
        }
        .to_string()
    }
    pub fn instructions(&self) -> String {
        self.inner.instructions().to_string()
    }

    // Overlay
    pub fn markers(&self) -> JsValue {
        to_js(&self.inner.markers())
    }
    /// Markers with their CSS transform, tooltip classes and inner HTML,
    /// ready to be turned into elements.
    pub fn marker_views(&self) -> JsValue {
        let views: Vec<_> = self
            .inner
            .markers()
            .iter()
            .map(|m| {
                serde_json::json!({
                    "kind": m.kind,
                    "key": m.key,
                    "left": m.left,
                    "top": m.top,
                    "transform": m.anchor.css_transform(),
                    "highlighted": m.highlighted,
                    "tooltip": m.tooltip.css_classes(),
                    "html": self.inner.marker_html(m),
                })
            })
            .collect();
        to_js(&views)
    }
    pub fn pick(&self, x: f64, y: f64) -> JsValue {
        self.inner.pick(x, y).map_or(JsValue::NULL, |p| to_js(&p))
    }
    pub fn pick_res(&self, x: f64, y: f64) -> JsValue {
        if let Some(e) = check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        if self.inner.scale().is_none() {
            return error::no_image();
        }
        error::ok(self.pick(x, y))
    }
    pub fn click(&mut self, x: f64, y: f64) -> JsValue {
        self.inner.click(x, y).map_or(JsValue::NULL, |p| to_js(&p))
    }
    pub fn natural_at(&self, x: f64, y: f64) -> JsValue {
        self.inner
            .natural_at(Point::new(x, y))
            .map_or(JsValue::NULL, |p| point(p.x, p.y))
    }
    pub fn center_offset(&self, viewport_w: f64, viewport_h: f64) -> Option<f64> {
        self.inner.center_offset(Size::new(viewport_w, viewport_h))
    }
    pub fn center_on_res(&mut self, name: &str, viewport_w: f64, viewport_h: f64) -> JsValue {
        if let Some(e) = check_finite(&[("viewport_w", viewport_w), ("viewport_h", viewport_h)]) {
            return e;
        }
        let r = self.inner.center_on(name, Size::new(viewport_w, viewport_h));
        error::res(r, JsValue::from_f64)
    }

    // Templates
    pub fn list_html(&self) -> String {
        self.inner.list_html()
    }
    pub fn details_html(&self) -> String {
        self.inner.details_html()
    }
    pub fn copy_text(&self, name: &str) -> Option<String> {
        self.inner.copy_text(name).ok()
    }
    pub fn copy_text_res(&self, name: &str) -> JsValue {
        error::res(self.inner.copy_text(name), |t| JsValue::from_str(&t))
    }

    // Data
    pub fn load_points_json(&mut self, text: &str) -> u32 {
        self.inner.load_points_json(text).map_or(0, |n| n as u32)
    }
    pub fn load_points_json_res(&mut self, text: &str) -> JsValue {
        error::res(self.inner.load_points_json(text), |n| JsValue::from_f64(n as f64))
    }
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.registry().to_json_value())
    }
    pub fn snapshot(&self) -> JsValue {
        to_js(&self.inner.snapshot())
    }
}
