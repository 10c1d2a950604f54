use floorplan::html;
use floorplan::{CaptureTool, Error, FloorId, MarkerKind, Point, Registry, Scale, Size};
use serde_json::{json, Value};

fn half_scale() -> Scale {
    Scale::new(Size::new(7000.0, 7200.0), Size::new(3500.0, 3600.0)).unwrap()
}

#[test]
fn capture_requires_selection_mode() {
    let mut tool = CaptureTool::default();
    let err = tool.capture(Point::new(10.0, 10.0), &half_scale(), "Copa").unwrap_err();
    assert!(matches!(err, Error::NotSelecting));
    assert_eq!(tool.instructions(), html::CAPTURE_INSTRUCTIONS);
    assert!(tool.toggle_selection());
    assert_eq!(tool.instructions(), html::CAPTURE_ACTIVE_INSTRUCTIONS);
}

#[test]
fn capture_stores_native_pixels_and_leaves_selection_mode() {
    let mut tool = CaptureTool::default();
    tool.toggle_selection();
    let p = tool.capture(Point::new(2187.4, 867.6), &half_scale(), "  Copa ").unwrap().clone();
    assert_eq!(p.id, 1);
    assert_eq!(p.name, "Copa");
    assert_eq!(p.position, Point::new(4374.0, 1736.0));
    assert_eq!(p.display, Some(Point::new(2187.0, 868.0)));
    assert_eq!(p.floor.as_str(), "terreo");
    assert!(!tool.is_selecting());
    assert_eq!(tool.next_id(), 2);
}

#[test]
fn rejected_captures_keep_selection_mode() {
    let mut tool = CaptureTool::default();
    tool.toggle_selection();
    assert!(matches!(tool.capture(Point::new(1.0, 1.0), &half_scale(), "   "), Err(Error::EmptyName)));
    assert!(matches!(
        tool.capture(Point::new(f64::INFINITY, 1.0), &half_scale(), "A"),
        Err(Error::NonFinite("x"))
    ));
    assert!(tool.points().is_empty());
    assert!(tool.is_selecting());
    assert!(tool.cancel_selection());
    assert!(!tool.cancel_selection());
}

#[test]
fn keyboard_capture_uses_the_overlay_centre() {
    let mut tool = CaptureTool::new(FloorId::new("mezanino"));
    tool.toggle_selection();
    let p = tool.capture_center(&half_scale(), "Centro").unwrap();
    assert_eq!(p.position, Point::new(3500.0, 3600.0));
    assert_eq!(p.floor.as_str(), "mezanino");
}

#[test]
fn markers_only_show_the_current_floor() {
    let mut tool = CaptureTool::default();
    let s = half_scale();
    tool.toggle_selection();
    tool.capture(Point::new(100.0, 100.0), &s, "A").unwrap();
    tool.switch_floor(FloorId::new("mezanino"));
    tool.toggle_selection();
    tool.capture(Point::new(200.0, 200.0), &s, "B").unwrap();

    let markers = tool.markers(&s);
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].kind, MarkerKind::Capture);
    assert_eq!(markers[0].key, "2");
    assert_eq!((markers[0].left, markers[0].top), (200, 200));
    assert_eq!(tool.points_on(&FloorId::default()).len(), 1);
}

#[test]
fn remove_and_clear() {
    let mut tool = CaptureTool::default();
    for name in ["A", "B", "C"] {
        tool.toggle_selection();
        tool.capture(Point::new(10.0, 10.0), &half_scale(), name).unwrap();
    }
    assert_eq!(tool.remove(2).unwrap().name, "B");
    assert_eq!(tool.remove(2).unwrap_err().code(), "invalid_id");
    let ids: Vec<u32> = tool.points().iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3]);
    tool.clear();
    assert!(tool.points().is_empty());
    assert_eq!(tool.next_id(), 1);
}

#[test]
fn export_is_pretty_json_with_whole_pixels() {
    let mut tool = CaptureTool::default();
    assert!(matches!(tool.export_json(), Err(Error::NothingToExport)));
    tool.toggle_selection();
    tool.capture(Point::new(2187.0, 867.0), &half_scale(), "Copa").unwrap();
    let text = tool.export_json().unwrap();
    assert!(text.contains('\n'));
    let v: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        v,
        json!([{ "nome": "Copa", "coordenadas": { "x": 4374, "y": 1734 }, "andar": "terreo" }])
    );
    assert_eq!(CaptureTool::export_filename("2026-10-17"), "coordenadas-mapa-2026-10-17.json");
}

#[test]
fn load_renumbers_and_defaults_the_floor() {
    let mut tool = CaptureTool::default();
    let doc = json!([
        { "nome": "A", "coordenadas": { "x": 1, "y": 2 }, "andar": "mezanino" },
        { "nome": "", "coordenadas": { "x": 3, "y": 4 } },
        { "nome": "C", "coordenadas": { "x": 5, "y": 6 } },
        { "coordenadas": { "x": 7, "y": 8 } }
    ]);
    assert_eq!(tool.load_json(&doc.to_string()).unwrap(), 2);
    let pts = tool.points();
    assert_eq!((pts[0].id, pts[0].floor.as_str()), (1, "mezanino"));
    assert_eq!((pts[1].id, pts[1].name.as_str(), pts[1].floor.as_str()), (2, "C", "terreo"));
    assert_eq!(tool.next_id(), 3);
    assert!(tool.load_json("{\"nome\": 1}").is_err());
    assert_eq!(tool.points().len(), 2, "failed load keeps the previous list");
}

#[test]
fn export_reloads_into_the_registry() {
    let mut tool = CaptureTool::default();
    tool.toggle_selection();
    tool.capture(Point::new(50.0, 60.0), &half_scale(), "RECEPCAO").unwrap();
    let mut reg = Registry::builtin().unwrap();
    let points = floorplan::json::parse_points_impl(&tool.export_json().unwrap()).unwrap();
    assert_eq!(reg.merge_points(&points), 1);
    let room = reg.room(&FloorId::default(), "RECEPCAO").unwrap();
    assert_eq!(room.position, Point::new(100.0, 120.0));
}

#[test]
fn points_outside_the_image_range_are_not_captured() {
    let mut tool = CaptureTool::default();
    tool.toggle_selection();
    let err = tool.capture(Point::new(-3.0, 10.0), &half_scale(), "Fora").unwrap_err();
    assert!(matches!(err, Error::OutOfBounds { x, y } if x == -6.0 && y == 20.0));
    assert_eq!(err.code(), "out_of_bounds");
    assert!(tool.points().is_empty());
    assert!(tool.is_selecting(), "a rejected click keeps selection mode");
    assert_eq!(tool.next_id(), 1);
}

#[test]
fn every_export_loads_back() {
    let mut tool = CaptureTool::default();
    for (i, at) in [(0.0, 0.0), (-0.4, 3499.6), (3500.0, 3600.0), (-3.0, 10.0), (1200.0, 40.0)]
        .into_iter()
        .enumerate()
    {
        tool.toggle_selection();
        let _ = tool.capture(Point::new(at.0, at.1), &half_scale(), &format!("P{i}"));
        tool.cancel_selection();
    }
    assert_eq!(tool.points().len(), 4);
    let export = tool.export_json().unwrap();

    let mut reloaded = CaptureTool::default();
    assert_eq!(reloaded.load_json(&export).unwrap(), 4);
    assert_eq!(reloaded.points()[1].position, Point::new(0.0, 7000.0));

    let mut viewer = floorplan::Viewer::builtin().unwrap();
    assert_eq!(viewer.load_points_json(&export).unwrap(), 4);
}

#[test]
fn capture_list_shows_floor_labels() {
    let mut tool = CaptureTool::new(FloorId::new("mezanino"));
    let reg = Registry::builtin().unwrap();
    assert_eq!(html::capture_list_html(tool.points(), &reg), html::EMPTY_CAPTURES_HTML);
    tool.toggle_selection();
    tool.capture(Point::new(50.0, 60.0), &half_scale(), "<Copa>").unwrap();
    let out = html::capture_list_html(tool.points(), &reg);
    assert!(out.contains("&lt;Copa&gt;"));
    assert!(out.contains("X: 100, Y: 120"));
    assert!(out.contains("Mezanino"));
    assert_eq!(html::capture_marker_title(&tool.points()[0]), "<Copa> (100, 120)");
}
