use crate::algorithms::placement::{place_captures, MarkerPlacement};
use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::geometry::scale::Scale;
use crate::html;
use crate::json::{self, check_name};
use crate::model::{CapturedPoint, FloorId, Point};

/// Coordinate-capture tool: click on the displayed floor plan, name the
/// spot, export the collected native-pixel coordinates as JSON.
#[derive(Clone, Debug)]
pub struct CaptureTool {
    points: Vec<CapturedPoint>,
    selecting: bool,
    floor: FloorId,
    next_id: u32,
}

impl Default for CaptureTool {
    fn default() -> Self {
        CaptureTool::new(FloorId::default())
    }
}

impl CaptureTool {
    pub fn new(floor: FloorId) -> Self {
        CaptureTool { points: Vec::new(), selecting: false, floor, next_id: 1 }
    }

    pub fn points(&self) -> &[CapturedPoint] {
        &self.points
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    pub fn floor(&self) -> &FloorId {
        &self.floor
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Turns selection mode on or off; returns the new state.
    pub fn toggle_selection(&mut self) -> bool {
        self.selecting = !self.selecting;
        log::debug!("selection mode: {}", if self.selecting { "ON" } else { "OFF" });
        self.selecting
    }

    pub fn cancel_selection(&mut self) -> bool {
        let was = self.selecting;
        self.selecting = false;
        was
    }

    pub fn instructions(&self) -> &'static str {
        if self.selecting {
            html::CAPTURE_ACTIVE_INSTRUCTIONS
        } else {
            html::CAPTURE_INSTRUCTIONS
        }
    }

    pub fn switch_floor(&mut self, floor: FloorId) {
        self.floor = floor;
    }

    /// Records a click at `display` (pixels relative to the displayed image).
    /// Selection mode ends after a successful capture; a point outside the
    /// image coordinate range is rejected with [`Error::OutOfBounds`].
    pub fn capture(&mut self, display: Point, scale: &Scale, name: &str) -> Result<&CapturedPoint> {
        if !self.selecting {
            return Err(Error::NotSelecting);
        }
        if !display.x.is_finite() {
            return Err(Error::NonFinite("x"));
        }
        if !display.y.is_finite() {
            return Err(Error::NonFinite("y"));
        }
        check_name(name)?;
        if self.points.len() >= limits::MAX_CAPTURED_POINTS {
            return Err(Error::LimitExceeded {
                what: "points",
                max: limits::MAX_CAPTURED_POINTS,
                got: self.points.len() + 1,
            });
        }
        let display = Point::new(display.x.round(), display.y.round());
        let position = scale.to_natural(display);
        // Same bounds as imported points.
        json::check_point(position)?;
        let id = self.next_id;
        self.next_id += 1;
        log::info!(
            "captured '{}' display ({}, {}) image ({}, {})",
            name.trim(),
            display.x,
            display.y,
            position.x,
            position.y
        );
        self.points.push(CapturedPoint {
            id,
            name: name.trim().to_string(),
            position,
            floor: self.floor.clone(),
            display: Some(display),
        });
        self.selecting = false;
        self.points.last().ok_or(Error::UnknownPoint(id))
    }

    /// Keyboard capture (Enter/Space) targets the centre of the overlay.
    pub fn capture_center(&mut self, scale: &Scale, name: &str) -> Result<&CapturedPoint> {
        let centre = Point::new(
            (scale.displayed.width / 2.0).round(),
            (scale.displayed.height / 2.0).round(),
        );
        self.capture(centre, scale, name)
    }

    pub fn remove(&mut self, id: u32) -> Result<CapturedPoint> {
        let idx = self
            .points
            .iter()
            .position(|p| p.id == id)
            .ok_or(Error::UnknownPoint(id))?;
        Ok(self.points.remove(idx))
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.next_id = 1;
    }

    pub fn points_on(&self, floor: &FloorId) -> Vec<&CapturedPoint> {
        self.points.iter().filter(|p| &p.floor == floor).collect()
    }

    /// Overlay markers for the current floor. Display positions recorded at
    /// click time are reused as-is.
    pub fn markers(&self, scale: &Scale) -> Vec<MarkerPlacement> {
        place_captures(self.points_on(&self.floor), scale)
    }

    pub fn overlay_html(&self, scale: &Scale) -> String {
        self.markers(scale)
            .iter()
            .zip(self.points_on(&self.floor))
            .map(|(m, p)| {
                let number = format!("<span class=\"marker-number\">{}</span>", p.id);
                html::marker_element_html(m, &number, Some(&html::capture_marker_title(p)))
            })
            .collect()
    }

    pub fn list_html(&self, registry: &crate::registry::Registry) -> String {
        html::capture_list_html(&self.points, registry)
    }

    pub fn export_json(&self) -> Result<String> {
        if self.points.is_empty() {
            return Err(Error::NothingToExport);
        }
        json::export_points_impl(&self.points)
    }

    /// Download name for an export made on `date` (`YYYY-MM-DD`).
    pub fn export_filename(date: &str) -> String {
        format!("coordenadas-mapa-{date}.json")
    }

    /// Replaces the captured list with a previous export. Ids restart at 1;
    /// entries without a name or position are dropped.
    pub fn load_json(&mut self, s: &str) -> Result<usize> {
        let items = json::parse_points_impl(s)?;
        self.points = items
            .into_iter()
            .filter_map(|p| match (p.name, p.position) {
                (Some(name), Some(position)) if check_name(&name).is_ok() => Some((name, position, p.floor)),
                _ => None,
            })
            .enumerate()
            .map(|(i, (name, position, floor))| CapturedPoint {
                id: i as u32 + 1,
                name: name.trim().to_string(),
                position,
                floor: floor.unwrap_or_default(),
                display: None,
            })
            .collect();
        self.next_id = self.points.len() as u32 + 1;
        self.selecting = false;
        Ok(self.points.len())
    }
}
