use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn dist_sq(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FloorId(pub String);

impl FloorId {
    pub const GROUND: &'static str = "terreo";
    pub const MEZZANINE: &'static str = "mezanino";

    pub fn new(id: impl Into<String>) -> Self {
        FloorId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FloorId {
    fn default() -> Self {
        FloorId::new(FloorId::GROUND)
    }
}

impl fmt::Display for FloorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FloorId {
    fn from(s: &str) -> Self {
        FloorId::new(s)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: FloorId,
    #[serde(rename = "nome")]
    pub label: String,
    #[serde(rename = "imagem")]
    pub image: String,
}

/// Room biography. Older entries carry a single paragraph; newer ones a
/// summary used for tooltips plus an expandable full text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Biography {
    Detailed {
        #[serde(rename = "resumo")]
        summary: String,
        #[serde(rename = "completa", default)]
        full: String,
        #[serde(rename = "referencias", default, skip_serializing_if = "Vec::is_empty")]
        references: Vec<String>,
    },
    Plain(String),
}

impl Biography {
    pub fn tooltip(&self) -> &str {
        match self {
            Biography::Detailed { summary, .. } => summary,
            Biography::Plain(text) => text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "codigo", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "coordenadas")]
    pub position: Point,
    #[serde(rename = "andar", default)]
    pub floor: FloorId,
    #[serde(rename = "codigoOutlook", default, skip_serializing_if = "Option::is_none")]
    pub outlook_code: Option<String>,
    #[serde(rename = "capacidade", default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(rename = "equipamentos", default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(rename = "biografia", default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<Biography>,
}

impl Room {
    pub fn new(name: impl Into<String>, position: Point, floor: FloorId) -> Self {
        Room {
            code: None,
            name: name.into(),
            position,
            floor,
            outlook_code: None,
            capacity: None,
            equipment: None,
            biography: None,
        }
    }

    pub fn tooltip(&self) -> &str {
        self.biography.as_ref().map_or("", Biography::tooltip)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    #[serde(rename = "nome")]
    pub name: String,
    pub emoji: String,
    #[serde(rename = "coordenadas")]
    pub position: Point,
}

/// A coordinate registered through the capture tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapturedPoint {
    pub id: u32,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "coordenadas")]
    pub position: Point,
    #[serde(rename = "andar")]
    pub floor: FloorId,
    #[serde(rename = "displayCoordinates", default, skip_serializing_if = "Option::is_none")]
    pub display: Option<Point>,
}
