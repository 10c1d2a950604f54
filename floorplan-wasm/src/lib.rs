use wasm_bindgen::prelude::*;
mod api;
mod capture;
mod counter;
mod dom;
mod error;
mod interop;
mod logger;

pub use counter::LocalStorageStore;
pub use dom::{mount_capture, mount_viewer};

#[wasm_bindgen]
pub struct Viewer { pub(crate) inner: floorplan::Viewer }

impl Viewer {
    pub fn rs_new(config: floorplan::ViewerConfig) -> floorplan::Result<Viewer> {
        let registry = floorplan::Registry::builtin()?;
        Ok(Viewer { inner: floorplan::Viewer::new(registry, config)? })
    }
}

#[wasm_bindgen]
pub struct CaptureTool {
    pub(crate) inner: floorplan::CaptureTool,
    pub(crate) scale: Option<floorplan::Scale>,
}

impl CaptureTool {
    pub fn rs_new() -> CaptureTool { CaptureTool { inner: floorplan::CaptureTool::default(), scale: None } }
}
