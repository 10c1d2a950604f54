use js_sys::{Array, Object, Reflect};
use serde::Serialize;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_str<'a>(items: impl IntoIterator<Item = &'a str>) -> Array {
    items.into_iter().map(JsValue::from_str).collect()
}
/// Plain JS objects and arrays (no `Map`s), `null` if serialization fails.
pub fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}
pub fn point(x: f64, y: f64) -> JsValue {
    let o = new_obj();
    set_kv(&o, "x", &JsValue::from_f64(x));
    set_kv(&o, "y", &JsValue::from_f64(y));
    o.into()
}
