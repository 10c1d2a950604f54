use crate::algorithms::picking::{pick_impl, Pick};
use crate::algorithms::placement::{
    center_scroll, place_landmarks, place_room, place_rooms, MarkerKind, MarkerPlacement,
};
use crate::algorithms::search::{room_id, step_index};
use crate::config::ViewerConfig;
use crate::error::{Error, Result};
use crate::geometry::scale::{Scale, Zoom};
use crate::html;
use crate::json;
use crate::model::{FloorId, Point, Room, Size};
use crate::registry::Registry;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Which room markers are drawn. Landmarks are drawn in every mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerMode {
    All,
    Selected,
    Hidden,
}

/// State of the room-location tool for one floor-plan view.
#[derive(Clone, Debug)]
pub struct Viewer {
    registry: Registry,
    config: ViewerConfig,
    floor: FloorId,
    selected: Option<String>,
    query: String,
    mode: MarkerMode,
    zoom: Zoom,
    natural: Option<Size>,
    displayed: Option<Size>,
    instructions: String,
}

impl Viewer {
    pub fn new(registry: Registry, config: ViewerConfig) -> Result<Viewer> {
        let floor = if registry.has_floor(&config.default_floor) {
            config.default_floor.clone()
        } else {
            registry
                .floors()
                .next()
                .map(|f| f.id.clone())
                .ok_or_else(|| Error::UnknownFloor(config.default_floor.to_string()))?
        };
        let zoom = Zoom::with_bounds(config.zoom_min, config.zoom_max, config.zoom_step);
        let mut v = Viewer {
            registry,
            config,
            floor,
            selected: None,
            query: String::new(),
            mode: MarkerMode::All,
            zoom,
            natural: None,
            displayed: None,
            instructions: String::new(),
        };
        v.show_all();
        Ok(v)
    }

    pub fn builtin() -> Result<Viewer> {
        Viewer::new(Registry::builtin()?, ViewerConfig::default())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn floor(&self) -> &FloorId {
        &self.floor
    }

    pub fn floor_label(&self) -> &str {
        self.registry.floor_label(&self.floor)
    }

    pub fn mode(&self) -> MarkerMode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn zoom(&self) -> f64 {
        self.zoom.value()
    }

    pub fn zoom_percent(&self) -> u32 {
        self.zoom.percent()
    }

    pub fn selected_room(&self) -> Option<&Room> {
        let name = self.selected.as_deref()?;
        self.registry.room(&self.floor, name)
    }

    fn set_instructions(&mut self, text: Option<String>) {
        self.instructions = text.unwrap_or_else(|| html::DEFAULT_INSTRUCTIONS.to_string());
    }

    // Image geometry

    /// Records the floor image's native and laid-out sizes (image load and
    /// debounced resize). Markers are derived from these on demand.
    pub fn set_image_size(&mut self, natural: Size, displayed: Size) -> Result<Scale> {
        let scale = Scale::new(natural, displayed)?;
        log::debug!(
            "overlay {}x{} for image {}x{} (scale {:.4}, {:.4})",
            displayed.width,
            displayed.height,
            natural.width,
            natural.height,
            scale.sx,
            scale.sy
        );
        self.natural = Some(natural);
        self.displayed = Some(displayed);
        Ok(scale.with_zoom(self.zoom.value()))
    }

    /// Current scale including zoom, once the image size is known.
    pub fn scale(&self) -> Option<Scale> {
        let s = Scale::new(self.natural?, self.displayed?).ok()?;
        Some(s.with_zoom(self.zoom.value()))
    }

    pub fn set_zoom(&mut self, z: f64) -> f64 {
        self.zoom.set(z)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom.zoom_in()
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom.zoom_out()
    }

    // Room list

    /// Rooms of the current floor matching the search, alphabetically.
    pub fn filtered_rooms(&self) -> Vec<&Room> {
        let mut rooms = self.registry.filter_rooms(&self.floor, &self.query);
        rooms.sort_by(|a, b| crate::algorithms::search::name_cmp(&a.name, &b.name));
        rooms
    }

    pub fn filter(&mut self, query: &str) -> usize {
        self.query = query.to_string();
        let count = self.filtered_rooms().len();
        let msg = if count == 0 {
            Some(html::NO_ROOMS_FOUND.to_string())
        } else if !query.trim().is_empty() {
            Some(html::found_rooms_message(count))
        } else {
            None
        };
        self.set_instructions(msg);
        count
    }

    /// Selects a room by exact name, switching floor when the room lives on
    /// another one.
    pub fn select(&mut self, name: &str) -> Result<&Room> {
        if self.registry.room(&self.floor, name).is_none() {
            let other = self
                .registry
                .find_room(name)
                .map(|r| r.floor.clone())
                .ok_or_else(|| Error::UnknownRoom(name.to_string()))?;
            self.switch_floor(&other)?;
        }
        self.selected = Some(name.to_string());
        self.mode = MarkerMode::Selected;
        self.set_instructions(Some(format!(
            "Sala {name} selecionada - localização destacada no mapa"
        )));
        log::info!("selected room {} on {}", name, self.floor);
        self.selected_room().ok_or_else(|| Error::UnknownRoom(name.to_string()))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.mode = MarkerMode::Hidden;
        self.set_instructions(None);
    }

    /// Moves the selection through the filtered list (1 = next, -1 = previous),
    /// wrapping at both ends.
    pub fn navigate(&mut self, direction: i32) -> Option<String> {
        let next = {
            let rooms = self.filtered_rooms();
            let current = self
                .selected
                .as_deref()
                .and_then(|s| rooms.iter().position(|r| r.name == s));
            let idx = step_index(current, rooms.len(), direction)?;
            rooms[idx].name.clone()
        };
        self.select(&next).ok()?;
        Some(next)
    }

    pub fn show_all(&mut self) {
        self.mode = MarkerMode::All;
        let count = self.registry.rooms(&self.floor).len();
        self.set_instructions(Some(format!(
            "Mostrando todas as {} salas do {}",
            count,
            self.floor_label().to_lowercase()
        )));
    }

    pub fn hide_all(&mut self) {
        self.mode = MarkerMode::Hidden;
        self.set_instructions(Some("Todos os marcadores foram ocultados".to_string()));
    }

    /// Changes floor. The previous image size no longer applies and must be
    /// reported again for the new floor image.
    pub fn switch_floor(&mut self, id: &FloorId) -> Result<()> {
        if !self.registry.has_floor(id) {
            return Err(Error::UnknownFloor(id.to_string()));
        }
        if &self.floor == id {
            return Ok(());
        }
        self.floor = id.clone();
        self.selected = None;
        self.query.clear();
        self.natural = None;
        self.displayed = None;
        self.show_all();
        let label = self.floor_label().to_string();
        self.set_instructions(Some(format!("Andar alterado para {label}")));
        log::info!("switched to floor {}", self.floor);
        Ok(())
    }

    // Overlay

    /// Marker placements for the current state: landmarks first, then rooms
    /// according to the marker mode. Empty until the image size is known.
    pub fn markers(&self) -> Vec<MarkerPlacement> {
        let Some(scale) = self.scale() else {
            return Vec::new();
        };
        let mut out = place_landmarks(
            self.registry.landmarks(&self.floor),
            &scale,
            self.config.landmark_tooltip_threshold,
        );
        let threshold = self.config.room_tooltip_threshold;
        match self.mode {
            MarkerMode::All => out.extend(place_rooms(
                self.registry.rooms(&self.floor),
                &scale,
                self.selected.as_deref(),
                threshold,
            )),
            MarkerMode::Selected => {
                if let Some(room) = self.selected_room() {
                    out.push(place_room(room, &scale, true, threshold));
                }
            }
            MarkerMode::Hidden => {}
        }
        out
    }

    pub fn pick(&self, x: f64, y: f64) -> Option<Pick> {
        pick_impl(&self.markers(), x, y, self.config.pick_tolerance)
    }

    /// Handles a click on the overlay: a room marker under the pointer is
    /// selected.
    pub fn click(&mut self, x: f64, y: f64) -> Option<Pick> {
        let hit = self.pick(x, y)?;
        if hit.kind == MarkerKind::Room {
            self.select(&hit.key).ok()?;
        }
        Some(hit)
    }

    /// Native image coordinate under a display point.
    pub fn natural_at(&self, display: Point) -> Option<Point> {
        Some(self.scale()?.to_natural(display))
    }

    /// Scroll offset that centres the selected room in a `viewport`.
    pub fn center_offset(&self, viewport: Size) -> Option<f64> {
        let room = self.selected_room()?;
        Some(center_scroll(room, &self.scale()?, viewport))
    }

    pub fn center_on(&mut self, name: &str, viewport: Size) -> Result<f64> {
        self.select(name)?;
        self.set_instructions(Some(format!("Centralizado na sala {name}")));
        Ok(self.center_offset(viewport).unwrap_or(0.0))
    }

    // Templating

    pub fn list_html(&self) -> String {
        html::room_list_html(&self.filtered_rooms(), self.selected.as_deref())
    }

    pub fn details_html(&self) -> String {
        match self.selected_room() {
            Some(room) => html::room_details_html(room, self.floor_label()),
            None => html::EMPTY_DETAILS_HTML.to_string(),
        }
    }

    pub fn marker_html(&self, m: &MarkerPlacement) -> String {
        match m.kind {
            MarkerKind::Room => self
                .registry
                .room(&self.floor, &m.key)
                .map(|r| html::room_marker_html(r, self.floor_label(), m.tooltip))
                .unwrap_or_default(),
            MarkerKind::Landmark => m
                .key
                .rsplit_once('-')
                .and_then(|(_, i)| i.parse::<usize>().ok())
                .and_then(|i| self.registry.landmarks(&self.floor).get(i))
                .map(|l| html::landmark_marker_html(l, &m.key, m.tooltip))
                .unwrap_or_default(),
            MarkerKind::Capture => html::escape(&m.label),
        }
    }

    /// Every marker of [`Viewer::markers`] as positioned overlay elements.
    pub fn overlay_html(&self) -> String {
        self.markers()
            .iter()
            .map(|m| html::marker_element_html(m, &self.marker_html(m), None))
            .collect()
    }

    pub fn copy_text(&self, name: &str) -> Result<String> {
        let room = self
            .registry
            .find_room(name)
            .ok_or_else(|| Error::UnknownRoom(name.to_string()))?;
        Ok(html::copy_text(room, self.registry.floor_label(&room.floor)))
    }

    // Data

    /// Merges a capture-tool export into the registry.
    pub fn load_points_json(&mut self, s: &str) -> Result<usize> {
        let points = json::parse_points_impl(s)?;
        Ok(self.registry.merge_points(&points))
    }

    /// Positions of every room keyed by [`room_id`]. Keys are not floor
    /// qualified: rooms whose names slug alike collapse to the last one.
    pub fn snapshot(&self) -> Value {
        let mut rooms = Map::new();
        for data in self.registry.floor_data() {
            for r in &data.rooms {
                rooms.insert(
                    room_id(&r.name),
                    json!({ "x": r.position.x, "y": r.position.y, "floor": r.floor }),
                );
            }
        }
        json!({
            "currentFloor": self.floor,
            "selectedRoom": self.selected,
            "zoom": self.zoom.value(),
            "rooms": rooms,
        })
    }
}
