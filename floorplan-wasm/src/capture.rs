use crate::api::check_finite;
use crate::error;
use crate::interop::to_js;
use crate::CaptureTool;
use floorplan::{FloorId, Point, Scale, Size};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
impl CaptureTool {
    #[wasm_bindgen(constructor)]
    pub fn new() -> CaptureTool {
        crate::CaptureTool::rs_new()
    }

    pub fn floor(&self) -> String {
        self.inner.floor().to_string()
    }
    /// The previous image size belongs to the old floor image.
    pub fn switch_floor(&mut self, id: &str) {
        self.inner.switch_floor(FloorId::new(id));
        self.scale = None;
    }
    pub fn set_image_size(&mut self, natural_w: f64, natural_h: f64, display_w: f64, display_h: f64) -> bool {
        match Scale::new(Size::new(natural_w, natural_h), Size::new(display_w, display_h)) {
            Ok(s) => {
                self.scale = Some(s);
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_selecting(&self) -> bool {
        self.inner.is_selecting()
    }
    pub fn toggle_selection(&mut self) -> bool {
        self.inner.toggle_selection()
    }
    pub fn cancel_selection(&mut self) -> bool {
        self.inner.cancel_selection()
    }
    pub fn instructions(&self) -> String {
        self.inner.instructions().to_string()
    }

    pub fn capture_res(&mut self, x: f64, y: f64, name: &str) -> JsValue {
        if let Some(e) = check_finite(&[("x", x), ("y", y)]) {
            return e;
        }
        let Some(scale) = self.scale else {
            return error::no_image();
        };
        error::res(self.inner.capture(Point::new(x, y), &scale, name).map(|p| to_js(p)), |v| v)
    }
    pub fn capture_center_res(&mut self, name: &str) -> JsValue {
        let Some(scale) = self.scale else {
            return error::no_image();
        };
        error::res(self.inner.capture_center(&scale, name).map(|p| to_js(p)), |v| v)
    }
    pub fn remove(&mut self, id: u32) -> bool {
        self.inner.remove(id).is_ok()
    }
    pub fn remove_res(&mut self, id: u32) -> JsValue {
        error::res(self.inner.remove(id), |p| to_js(&p))
    }
    pub fn clear(&mut self) {
        self.inner.clear()
    }
    pub fn count(&self) -> u32 {
        self.inner.points().len() as u32
    }
    pub fn points(&self) -> JsValue {
        to_js(self.inner.points())
    }
    pub fn markers(&self) -> JsValue {
        self.scale.map_or(JsValue::NULL, |s| to_js(&self.inner.markers(&s)))
    }

    pub fn export_json(&self) -> Option<String> {
        self.inner.export_json().ok()
    }
    pub fn export_json_res(&self) -> JsValue {
        error::res(self.inner.export_json(), |s| JsValue::from_str(&s))
    }
    pub fn export_filename(date: &str) -> String {
        floorplan::CaptureTool::export_filename(date)
    }
    pub fn load_json_res(&mut self, text: &str) -> JsValue {
        error::res(self.inner.load_json(text), |n| JsValue::from_f64(n as f64))
    }
}
