use floorplan::json::PointImport;
use floorplan::{Biography, Error, FloorId, Point, Registry};
use serde_json::json;

fn ground() -> FloorId {
    FloorId::new("terreo")
}

fn mezzanine() -> FloorId {
    FloorId::new("mezanino")
}

#[test]
fn builtin_dataset_loads_both_floors() {
    let reg = Registry::builtin().unwrap();
    let ids: Vec<&str> = reg.floors().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["terreo", "mezanino"]);
    assert_eq!(reg.rooms(&ground()).len(), 26);
    assert_eq!(reg.landmarks(&ground()).len(), 17);
    assert_eq!(reg.rooms(&mezzanine()).len(), 8);
    assert_eq!(reg.landmarks(&mezzanine()).len(), 9);
    assert_eq!(reg.room_count(), 34);
    assert_eq!(reg.floor_label(&ground()), "Térreo");
    assert_eq!(reg.floor_label(&FloorId::new("attic")), "attic");
}

#[test]
fn both_biography_formats_are_read() {
    let reg = Registry::builtin().unwrap();
    let tesla = reg.room(&ground(), "TESLA").unwrap();
    match tesla.biography.as_ref().unwrap() {
        Biography::Detailed { summary, references, .. } => {
            assert!(summary.starts_with("Nikola Tesla"));
            assert_eq!(references.len(), 2);
        }
        other => panic!("expected detailed biography, got {:?}", other),
    }
    let pascal = reg.room(&ground(), "PASCAL").unwrap();
    assert!(matches!(pascal.biography, Some(Biography::Plain(_))));
    assert!(pascal.tooltip().starts_with("Blaise Pascal"));
    assert_eq!(pascal.capacity, Some(4));
    assert_eq!(pascal.position, Point::new(4297.0, 3857.0));
}

#[test]
fn filter_is_case_insensitive_and_trimmed() {
    let reg = Registry::builtin().unwrap();
    let names: Vec<&str> = reg.filter_rooms(&ground(), "  er ").iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names.len(), 4);
    for n in ["COOPER", "LERDORF", "CHAMBERLIN", "OSLER"] {
        assert!(names.contains(&n), "missing {n}");
    }
    assert_eq!(reg.filter_rooms(&ground(), "").len(), 26);
    assert!(reg.filter_rooms(&ground(), "zzz").is_empty());
}

#[test]
fn sorted_rooms_are_alphabetical() {
    let reg = Registry::builtin().unwrap();
    let names: Vec<&str> = reg.sorted_rooms(&mezzanine()).iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["DA VINCI", "HAMILTON", "HOOVER", "HOPPER", "LAMARR", "LISKOV", "NEUMANN", "WILSON"]
    );
}

#[test]
fn find_room_searches_every_floor() {
    let reg = Registry::builtin().unwrap();
    assert_eq!(reg.find_room("HOPPER").unwrap().floor, mezzanine());
    assert!(reg.room(&ground(), "HOPPER").is_none());
    assert!(reg.find_room("hopper").is_none(), "lookups are exact");
}

#[test]
fn merge_points_moves_existing_and_adds_new() {
    let mut reg = Registry::builtin().unwrap();
    let points = vec![
        PointImport {
            name: Some("TESLA".into()),
            position: Some(Point::new(500.0, 2000.0)),
            floor: Some(ground()),
        },
        PointImport { name: Some("COPA".into()), position: Some(Point::new(10.0, 20.0)), floor: None },
        PointImport { name: None, position: Some(Point::new(1.0, 1.0)), floor: None },
        PointImport { name: Some("X".into()), position: Some(Point::new(1.0, 1.0)), floor: Some("attic".into()) },
    ];
    assert_eq!(reg.merge_points(&points), 2);
    assert_eq!(reg.room(&ground(), "TESLA").unwrap().position, Point::new(500.0, 2000.0));
    let copa = reg.room(&ground(), "COPA").unwrap();
    assert_eq!(copa.floor, ground());
    assert_eq!(reg.rooms(&ground()).len(), 27);
}

#[test]
fn registry_json_export_reloads() {
    let reg = Registry::builtin().unwrap();
    let v = reg.to_json_value();
    assert_eq!(v["version"], 1);
    assert_eq!(v["floors"][1]["andar"]["id"], "mezanino");
    let back = Registry::from_json_value(v).unwrap();
    assert_eq!(back.room_count(), reg.room_count());
    assert_eq!(back.room(&ground(), "TESLA"), reg.room(&ground(), "TESLA"));
}

#[test]
fn floor_documents_pin_rooms_to_their_floor() {
    let mut reg = Registry::empty();
    let doc = json!({
        "andar": { "id": "terceiro", "nome": "Terceiro", "imagem": "terceiro.png" },
        "salas": [ { "nome": "ATLAS", "coordenadas": { "x": 10, "y": 10 }, "andar": "terreo" } ]
    });
    let id = reg.add_floor_json(&doc.to_string()).unwrap();
    assert_eq!(id.as_str(), "terceiro");
    assert_eq!(reg.rooms(&id)[0].floor, id);
    assert!(reg.landmarks(&id).is_empty());
}

#[test]
fn floor_documents_reject_bad_coordinates_and_names() {
    let mut reg = Registry::empty();
    let out_of_bounds = json!({
        "andar": { "id": "t", "nome": "T", "imagem": "t.png" },
        "salas": [ { "nome": "A", "coordenadas": { "x": -5, "y": 10 } } ]
    });
    assert!(matches!(
        reg.add_floor_json(&out_of_bounds.to_string()),
        Err(Error::OutOfBounds { .. })
    ));
    let blank = json!({
        "andar": { "id": "t", "nome": "T", "imagem": "t.png" },
        "pontosFixos": [ { "nome": "  ", "emoji": "☕", "coordenadas": { "x": 5, "y": 10 } } ]
    });
    assert!(matches!(reg.add_floor_json(&blank.to_string()), Err(Error::EmptyName)));
    assert!(matches!(reg.add_floor_json("{"), Err(Error::Json(_))));
    assert_eq!(reg.floors().count(), 0);
}

#[test]
fn room_names_are_unique_per_floor() {
    let mut reg = Registry::empty();
    let doc = json!({
        "andar": { "id": "x", "nome": "X", "imagem": "x.png" },
        "salas": [
            { "nome": "A", "coordenadas": { "x": 1, "y": 1 } },
            { "nome": "B", "coordenadas": { "x": 2, "y": 2 } },
            { "nome": "A", "coordenadas": { "x": 3, "y": 3 } }
        ]
    });
    let err = reg.add_floor_json(&doc.to_string()).unwrap_err();
    assert!(matches!(&err, Error::DuplicateRoom(name) if name == "A"));
    assert_eq!(err.code(), "duplicate_room");
    assert_eq!(reg.floors().count(), 0);

    let export = json!({ "version": 1, "floors": [doc] });
    assert!(matches!(Registry::from_json_value(export), Err(Error::DuplicateRoom(_))));
}

#[test]
fn merged_points_never_duplicate_a_name() {
    let mut reg = Registry::builtin().unwrap();
    let twice = [
        PointImport { name: Some("COPA".into()), position: Some(Point::new(10.0, 10.0)), floor: None },
        PointImport { name: Some("COPA".into()), position: Some(Point::new(20.0, 20.0)), floor: None },
    ];
    assert_eq!(reg.merge_points(&twice), 2);
    let copas = reg.rooms(&ground()).iter().filter(|r| r.name == "COPA").count();
    assert_eq!(copas, 1);
    assert_eq!(reg.room(&ground(), "COPA").unwrap().position, Point::new(20.0, 20.0));
}

#[test]
fn room_cap_is_enforced() {
    let rooms: Vec<_> = (0..2_001)
        .map(|i| json!({ "nome": format!("R{i}"), "coordenadas": { "x": 1, "y": 1 } }))
        .collect();
    let doc = json!({ "andar": { "id": "big", "nome": "Big", "imagem": "b.png" }, "salas": rooms });
    let err = Registry::empty().add_floor_json(&doc.to_string()).unwrap_err();
    assert_eq!(err.code(), "limit_exceeded");
}
