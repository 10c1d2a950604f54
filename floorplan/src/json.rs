use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::model::{CapturedPoint, Floor, FloorId, Landmark, Point, Room};
use crate::registry::{FloorData, Registry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

pub const DOC_VERSION: u32 = 1;

/// One floor as stored in `data/*.json`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FloorDoc {
    #[serde(rename = "andar")]
    pub floor: Floor,
    #[serde(rename = "salas", default)]
    pub rooms: Vec<Room>,
    #[serde(rename = "pontosFixos", default)]
    pub landmarks: Vec<Landmark>,
}

/// Loosely typed coordinate record coming from the capture tool export or
/// from hand-edited files. Entries without a name or position are skipped.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PointImport {
    #[serde(rename = "nome", default)]
    pub name: Option<String>,
    #[serde(rename = "coordenadas", default)]
    pub position: Option<Point>,
    #[serde(rename = "andar", default)]
    pub floor: Option<FloorId>,
}

pub(crate) fn check_point(p: Point) -> Result<()> {
    if !p.x.is_finite() {
        return Err(Error::NonFinite("x"));
    }
    if !p.y.is_finite() {
        return Err(Error::NonFinite("y"));
    }
    if limits::in_coord_bounds(p.x) && limits::in_coord_bounds(p.y) {
        Ok(())
    } else {
        Err(Error::OutOfBounds { x: p.x, y: p.y })
    }
}

pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::EmptyName);
    }
    let got = name.chars().count();
    if got > limits::MAX_NAME_LEN {
        return Err(Error::LimitExceeded { what: "name", max: limits::MAX_NAME_LEN, got });
    }
    Ok(())
}

fn check_cap(what: &'static str, max: usize, got: usize) -> Result<()> {
    if got > max {
        Err(Error::LimitExceeded { what, max, got })
    } else {
        Ok(())
    }
}

/// Validates a floor document and pins every room to the document's floor.
/// Room names are the lookup key, so each may appear once per floor.
pub fn floor_from_doc(doc: FloorDoc) -> Result<FloorData> {
    check_cap("rooms", limits::MAX_ROOMS_PER_FLOOR, doc.rooms.len())?;
    check_cap("landmarks", limits::MAX_LANDMARKS_PER_FLOOR, doc.landmarks.len())?;
    let mut rooms = doc.rooms;
    let mut seen = HashSet::with_capacity(rooms.len());
    for r in rooms.iter_mut() {
        check_name(&r.name)?;
        check_point(r.position)?;
        if !seen.insert(r.name.clone()) {
            return Err(Error::DuplicateRoom(r.name.clone()));
        }
        r.floor = doc.floor.id.clone();
    }
    for l in doc.landmarks.iter() {
        check_name(&l.name)?;
        check_point(l.position)?;
    }
    Ok(FloorData { floor: doc.floor, rooms, landmarks: doc.landmarks })
}

pub fn floor_from_str(s: &str) -> Result<FloorData> {
    let doc: FloorDoc = serde_json::from_str(s)?;
    floor_from_doc(doc)
}

pub fn floor_to_doc(data: &FloorData) -> FloorDoc {
    FloorDoc {
        floor: data.floor.clone(),
        rooms: data.rooms.clone(),
        landmarks: data.landmarks.clone(),
    }
}

pub fn to_json_impl(reg: &Registry) -> Value {
    #[derive(Serialize)]
    struct Doc {
        version: u32,
        floors: Vec<FloorDoc>,
    }
    let doc = Doc {
        version: DOC_VERSION,
        floors: reg.floor_data().iter().map(floor_to_doc).collect(),
    };
    serde_json::to_value(doc).unwrap_or(Value::Null)
}

pub fn from_json_impl(v: Value) -> Result<Registry> {
    #[derive(Deserialize)]
    struct Doc {
        #[serde(default)]
        version: u32,
        floors: Vec<FloorDoc>,
    }
    let doc: Doc = serde_json::from_value(v)?;
    if doc.version > DOC_VERSION {
        log::warn!("registry document version {} is newer than {}", doc.version, DOC_VERSION);
    }
    check_cap("floors", limits::MAX_FLOORS, doc.floors.len())?;
    let mut reg = Registry::empty();
    for f in doc.floors {
        reg.add_floor(floor_from_doc(f)?)?;
    }
    Ok(reg)
}

/// Export format of the capture tool: `[{ nome, coordenadas, andar }]`.
pub fn export_points_impl(points: &[CapturedPoint]) -> Result<String> {
    #[derive(Serialize)]
    struct Pixel {
        x: i64,
        y: i64,
    }
    #[derive(Serialize)]
    struct Out<'a> {
        nome: &'a str,
        coordenadas: Pixel,
        andar: &'a FloorId,
    }
    // Captured coordinates are whole native pixels.
    let out: Vec<Out<'_>> = points
        .iter()
        .map(|p| Out {
            nome: &p.name,
            coordenadas: Pixel { x: p.position.x.round() as i64, y: p.position.y.round() as i64 },
            andar: &p.floor,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&out)?)
}

pub fn parse_points_impl(s: &str) -> Result<Vec<PointImport>> {
    let v: Value = serde_json::from_str(s)?;
    parse_points_value(v)
}

pub fn parse_points_value(v: Value) -> Result<Vec<PointImport>> {
    let items: Vec<PointImport> = serde_json::from_value(v)?;
    check_cap("points", limits::MAX_CAPTURED_POINTS, items.len())?;
    for p in items.iter() {
        if let Some(pos) = p.position {
            check_point(pos)?;
        }
    }
    Ok(items)
}
