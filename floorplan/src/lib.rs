//! Office floor-plan viewer core: room registry, image/display coordinate
//! scaling, marker placement and hit-testing, sidebar templating, the
//! coordinate-capture tool and the visit counter.

pub mod capture;
pub mod config;
pub mod counter;
pub mod error;
pub mod html;
pub mod json;
pub mod model;
pub mod registry;
pub mod viewer;
pub mod geometry {
    pub mod limits;
    pub mod scale;
    pub mod tolerance;
}
pub mod algorithms {
    pub mod picking;
    pub mod placement;
    pub mod search;
}

pub use algorithms::picking::Pick;
pub use algorithms::placement::{MarkerKind, MarkerPlacement, TooltipSide};
pub use capture::CaptureTool;
pub use config::{CounterConfig, ViewerConfig, VISITS_KEY};
pub use error::{Error, Result};
pub use geometry::scale::{Scale, Zoom};
pub use model::{Biography, CapturedPoint, Floor, FloorId, Landmark, Point, Room, Size};
pub use registry::{FloorData, Registry};
pub use viewer::{MarkerMode, Viewer};

impl Registry {
    pub fn to_json_value(&self) -> serde_json::Value {
        json::to_json_impl(self)
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<Registry> {
        json::from_json_impl(v)
    }

    pub fn from_json_str(s: &str) -> Result<Registry> {
        json::from_json_impl(serde_json::from_str(s)?)
    }
}
