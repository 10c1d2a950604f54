use crate::algorithms::search::{matches_query, name_cmp};
use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::json::{self, check_name, PointImport};
use crate::model::{Floor, FloorId, Landmark, Room};

const GROUND_FLOOR_JSON: &str = include_str!("../data/terreo.json");
const MEZZANINE_FLOOR_JSON: &str = include_str!("../data/mezanino.json");

#[derive(Clone, Debug)]
pub struct FloorData {
    pub floor: Floor,
    pub rooms: Vec<Room>,
    pub landmarks: Vec<Landmark>,
}

/// Reference data for every floor: rooms and fixed landmarks, in the order
/// they were loaded.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    floors: Vec<FloorData>,
}

impl Registry {
    pub fn empty() -> Self {
        Registry::default()
    }

    /// The embedded ground floor and mezzanine dataset.
    pub fn builtin() -> Result<Self> {
        let mut reg = Registry::empty();
        reg.add_floor_json(GROUND_FLOOR_JSON)?;
        reg.add_floor_json(MEZZANINE_FLOOR_JSON)?;
        Ok(reg)
    }

    /// Adds a floor, replacing one with the same id.
    pub fn add_floor(&mut self, data: FloorData) -> Result<()> {
        if let Some(slot) = self.floors.iter_mut().find(|f| f.floor.id == data.floor.id) {
            *slot = data;
            return Ok(());
        }
        if self.floors.len() >= limits::MAX_FLOORS {
            return Err(Error::LimitExceeded {
                what: "floors",
                max: limits::MAX_FLOORS,
                got: self.floors.len() + 1,
            });
        }
        log::info!(
            "floor '{}' loaded: {} rooms, {} landmarks",
            data.floor.id,
            data.rooms.len(),
            data.landmarks.len()
        );
        self.floors.push(data);
        Ok(())
    }

    pub fn add_floor_json(&mut self, s: &str) -> Result<FloorId> {
        let data = json::floor_from_str(s)?;
        let id = data.floor.id.clone();
        self.add_floor(data)?;
        Ok(id)
    }

    pub fn floor_data(&self) -> &[FloorData] {
        &self.floors
    }

    pub fn floors(&self) -> impl Iterator<Item = &Floor> {
        self.floors.iter().map(|f| &f.floor)
    }

    pub fn floor(&self, id: &FloorId) -> Option<&Floor> {
        self.data(id).map(|f| &f.floor)
    }

    pub fn has_floor(&self, id: &FloorId) -> bool {
        self.data(id).is_some()
    }

    fn data(&self, id: &FloorId) -> Option<&FloorData> {
        self.floors.iter().find(|f| &f.floor.id == id)
    }

    fn data_mut(&mut self, id: &FloorId) -> Option<&mut FloorData> {
        self.floors.iter_mut().find(|f| &f.floor.id == id)
    }

    /// Human label of a floor, falling back to the raw id.
    pub fn floor_label<'a>(&'a self, id: &'a FloorId) -> &'a str {
        self.floor(id).map_or(id.as_str(), |f| f.label.as_str())
    }

    pub fn rooms(&self, id: &FloorId) -> &[Room] {
        self.data(id).map_or(&[], |f| f.rooms.as_slice())
    }

    pub fn landmarks(&self, id: &FloorId) -> &[Landmark] {
        self.data(id).map_or(&[], |f| f.landmarks.as_slice())
    }

    pub fn room(&self, floor: &FloorId, name: &str) -> Option<&Room> {
        self.rooms(floor).iter().find(|r| r.name == name)
    }

    /// Looks a room up on every floor, in floor order.
    pub fn find_room(&self, name: &str) -> Option<&Room> {
        self.floors.iter().flat_map(|f| f.rooms.iter()).find(|r| r.name == name)
    }

    pub fn room_count(&self) -> usize {
        self.floors.iter().map(|f| f.rooms.len()).sum()
    }

    pub fn sorted_rooms(&self, floor: &FloorId) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms(floor).iter().collect();
        rooms.sort_by(|a, b| name_cmp(&a.name, &b.name));
        rooms
    }

    pub fn filter_rooms(&self, floor: &FloorId, query: &str) -> Vec<&Room> {
        self.rooms(floor).iter().filter(|r| matches_query(&r.name, query)).collect()
    }

    /// Registers externally captured coordinates as rooms. A point naming an
    /// existing room on its floor moves that room. Returns how many points
    /// were applied.
    pub fn merge_points(&mut self, points: &[PointImport]) -> usize {
        let mut applied = 0;
        for p in points {
            let (name, pos) = match (&p.name, p.position) {
                (Some(n), Some(pos)) if check_name(n).is_ok() => (n.trim(), pos),
                _ => {
                    log::debug!("skipping incomplete point {:?}", p);
                    continue;
                }
            };
            let floor = p.floor.clone().unwrap_or_default();
            let Some(data) = self.data_mut(&floor) else {
                log::warn!("skipping point '{}': floor '{}' not loaded", name, floor);
                continue;
            };
            if let Some(room) = data.rooms.iter_mut().find(|r| r.name == name) {
                room.position = pos;
            } else if data.rooms.len() < limits::MAX_ROOMS_PER_FLOOR {
                data.rooms.push(Room::new(name, pos, floor.clone()));
            } else {
                log::warn!("skipping point '{}': floor '{}' is full", name, floor);
                continue;
            }
            applied += 1;
        }
        applied
    }
}
