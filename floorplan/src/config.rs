use crate::error::Result;
use crate::geometry::tolerance::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::model::FloorId;
use serde::{Deserialize, Serialize};

pub const VISITS_KEY: &str = "mapa-philips-visits";

/// Viewer settings. Every field has a default so partial JSON documents
/// (or an empty `{}`) are accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Distance from the image edge (display px) at which room tooltips flip.
    pub room_tooltip_threshold: f64,
    pub landmark_tooltip_threshold: f64,
    /// Display-space radius used when hit-testing markers.
    pub pick_tolerance: f64,
    pub zoom_min: f64,
    pub zoom_max: f64,
    pub zoom_step: f64,
    pub resize_debounce_ms: u32,
    pub default_floor: FloorId,
    pub counter: CounterConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            room_tooltip_threshold: 100.0,
            landmark_tooltip_threshold: 80.0,
            pick_tolerance: 12.0,
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_step: ZOOM_STEP,
            resize_debounce_ms: 250,
            default_floor: FloorId::default(),
            counter: CounterConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub key: String,
    /// Endpoint backed by the relational table.
    pub table_endpoint: Option<String>,
    /// Endpoint backed by the key-value store.
    pub kv_endpoint: Option<String>,
    pub use_local_storage: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        CounterConfig {
            key: VISITS_KEY.to_string(),
            table_endpoint: Some("/api/visits".to_string()),
            kv_endpoint: Some("/api/visits-kv".to_string()),
            use_local_storage: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(s: &str) -> Result<ViewerConfig> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_value(v: serde_json::Value) -> Result<ViewerConfig> {
        Ok(serde_json::from_value(v)?)
    }
}
