use crate::interop::{new_obj, set_kv};
use floorplan::Error;
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn no_image() -> JsValue {
    err("no_image", "floor image size not reported yet", None)
}

/// Envelope for a core error; the code is [`Error::code`].
pub fn from_error(e: &Error) -> JsValue {
    match e {
        Error::NonFinite(param) => non_finite(param),
        Error::UnknownPoint(id) => invalid_id("point", *id),
        Error::UnknownRoom(name) | Error::UnknownFloor(name) | Error::DuplicateRoom(name) => {
            let d = new_obj(); set_kv(&d, "name", &JsValue::from_str(name));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        Error::LimitExceeded { what, max, got } => {
            let d = new_obj();
            set_kv(&d, "what", &JsValue::from_str(what));
            set_kv(&d, "max", &JsValue::from_f64(*max as f64));
            set_kv(&d, "got", &JsValue::from_f64(*got as f64));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        Error::OutOfBounds { x, y } => {
            let d = new_obj();
            set_kv(&d, "x", &JsValue::from_f64(*x));
            set_kv(&d, "y", &JsValue::from_f64(*y));
            err(e.code(), e.to_string(), Some(d.into()))
        }
        _ => err(e.code(), e.to_string(), None),
    }
}

pub fn res<T>(r: floorplan::Result<T>, f: impl FnOnce(T) -> JsValue) -> JsValue {
    match r {
        Ok(v) => ok(f(v)),
        Err(e) => from_error(&e),
    }
}

/// Thrown value for constructors and DOM entry points.
pub fn to_js_error(e: floorplan::Error) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}
