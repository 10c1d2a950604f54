use floorplan_wasm::{CaptureTool, Viewer};
use js_sys::{Array, Reflect};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn get(v: &JsValue, key: &str) -> JsValue {
    Reflect::get(v, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn is_ok(v: &JsValue) -> bool {
    get(v, "ok").as_bool() == Some(true)
}

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

fn sized_viewer() -> Viewer {
    let mut v = Viewer::new().unwrap();
    assert!(v.set_image_size(7000.0, 7200.0, 3500.0, 3600.0));
    v
}

#[wasm_bindgen_test]
fn starts_on_the_ground_floor() {
    let v = Viewer::new().unwrap();
    assert_eq!(v.floor(), "terreo");
    assert_eq!(v.floor_label(), "Térreo");
    assert_eq!(v.mode(), "all");
    assert_eq!(Array::from(&v.floors()).length(), 2);
    assert_eq!(v.room_names().length(), 26);
    assert!(v.scale().is_null());
}

#[wasm_bindgen_test]
fn config_object_is_merged_with_defaults() {
    let cfg = js_sys::Object::new();
    Reflect::set(&cfg, &"default_floor".into(), &"mezanino".into()).unwrap();
    Reflect::set(&cfg, &"pick_tolerance".into(), &JsValue::from_f64(4.0)).unwrap();
    let v = Viewer::with_config(cfg.into()).unwrap();
    assert_eq!(v.floor(), "mezanino");
    let c = v.config();
    assert_eq!(get(&c, "pick_tolerance").as_f64(), Some(4.0));
    assert_eq!(get(&c, "room_tooltip_threshold").as_f64(), Some(100.0));
    assert!(Viewer::with_config(JsValue::from_str("nope")).is_err());
}

#[wasm_bindgen_test]
fn selection_envelopes() {
    let mut v = sized_viewer();
    let r = v.select_res("TESLA");
    assert!(is_ok(&r));
    assert_eq!(get(&get(&r, "value"), "codigo").as_string().as_deref(), Some("T-MR02"));
    assert_eq!(v.mode(), "selected");
    assert!(is_err(&v.select_res("NOBODY"), "unknown_room"));
    assert!(is_err(&v.switch_floor_res("attic"), "unknown_floor"));
    assert_eq!(v.floor(), "terreo", "state mutated on error");
}

#[wasm_bindgen_test]
fn geometry_errors_are_typed() {
    let mut v = Viewer::new().unwrap();
    assert!(is_err(&v.pick_res(10.0, 10.0), "no_image"));
    assert!(is_err(&v.set_image_size_res(f64::NAN, 1.0, 1.0, 1.0), "non_finite"));
    assert!(is_err(&v.set_image_size_res(0.0, 7200.0, 3500.0, 3600.0), "invalid_size"));
    assert!(is_ok(&v.set_image_size_res(7000.0, 7200.0, 3500.0, 3600.0)));
    assert!(is_err(&v.pick_res(f64::INFINITY, 0.0), "non_finite"));
    assert!(is_err(&v.set_zoom_res(f64::NAN), "non_finite"));
    assert_eq!(v.zoom(), 1.0);
}

#[wasm_bindgen_test]
fn click_selects_and_marker_views_render() {
    let mut v = sized_viewer();
    let hit = v.click(2188.0, 868.0);
    assert_eq!(get(&hit, "key").as_string().as_deref(), Some("EINSTEIN"));
    assert_eq!(get(&hit, "kind").as_string().as_deref(), Some("room"));
    let views = Array::from(&v.marker_views());
    assert_eq!(views.length(), 17 + 1);
    let room = views.get(17);
    assert_eq!(get(&room, "transform").as_string().as_deref(), Some("translate(-50%, -50%)"));
    assert_eq!(get(&room, "highlighted").as_bool(), Some(true));
    let natural = v.natural_at(2187.5, 867.5);
    assert_eq!(get(&natural, "x").as_f64(), Some(4375.0));
}

#[wasm_bindgen_test]
fn navigation_and_copy() {
    let mut v = Viewer::new().unwrap();
    assert_eq!(v.filter("er"), 4);
    assert_eq!(v.navigate(1).as_deref(), Some("CHAMBERLIN"));
    assert_eq!(v.navigate(-1).as_deref(), Some("OSLER"));
    let text = v.copy_text_res("OSLER");
    assert!(is_ok(&text));
    assert!(get(&text, "value").as_string().unwrap().starts_with("Sala: OSLER"));
    assert!(is_err(&v.copy_text_res("NOPE"), "unknown_room"));
}

#[wasm_bindgen_test]
fn snapshot_is_a_plain_object() {
    let mut v = Viewer::new().unwrap();
    v.select("HOPPER");
    let snap = v.snapshot();
    assert_eq!(get(&snap, "currentFloor").as_string().as_deref(), Some("mezanino"));
    let rooms = get(&snap, "rooms");
    assert_eq!(get(&get(&rooms, "hopper"), "x").as_f64(), Some(2267.0));
}

#[wasm_bindgen_test]
fn capture_tool_envelopes() {
    let mut t = CaptureTool::new();
    assert!(is_err(&t.capture_res(1.0, 1.0, "A"), "no_image"));
    assert!(t.set_image_size(7000.0, 7200.0, 3500.0, 3600.0));
    assert!(is_err(&t.capture_res(1.0, 1.0, "A"), "not_selecting"));
    t.toggle_selection();
    assert!(is_err(&t.capture_res(1.0, 1.0, "  "), "empty_name"));
    let r = t.capture_res(50.0, 60.0, "Copa");
    assert!(is_ok(&r));
    let point = get(&get(&r, "value"), "coordenadas");
    assert_eq!(get(&point, "x").as_f64(), Some(100.0));
    assert!(!t.is_selecting());
    assert!(is_err(&t.remove_res(9), "invalid_id"));
    assert!(is_ok(&t.export_json_res()));
    t.clear();
    assert!(is_err(&t.export_json_res(), "nothing_to_export"));
    assert_eq!(CaptureTool::export_filename("2026-10-17"), "coordenadas-mapa-2026-10-17.json");
}

#[wasm_bindgen_test]
fn points_load_into_the_viewer() {
    let mut v = Viewer::new().unwrap();
    let r = v.load_points_json_res(r#"[{"nome":"COPA","coordenadas":{"x":10,"y":20}}]"#);
    assert_eq!(get(&r, "value").as_f64(), Some(1.0));
    assert!(is_err(&v.load_points_json_res("{"), "invalid_json"));
    assert!(is_err(
        &v.load_points_json_res(r#"[{"nome":"X","coordenadas":{"x":-1,"y":0}}]"#),
        "out_of_bounds"
    ));
}
