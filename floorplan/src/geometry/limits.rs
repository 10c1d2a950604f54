// Centralized ingestion limits for floor documents and captured points (JSON)

// Registry size caps
pub const MAX_FLOORS: usize = 64;
pub const MAX_ROOMS_PER_FLOOR: usize = 2_000;
pub const MAX_LANDMARKS_PER_FLOOR: usize = 2_000;
pub const MAX_CAPTURED_POINTS: usize = 10_000;

// Text caps
pub const MAX_NAME_LEN: usize = 200;

// Numeric bounds; floor images are a few thousand pixels wide
pub const COORD_MIN: f64 = 0.0;
pub const COORD_MAX: f64 = 100_000.0;
pub const IMAGE_DIM_MAX: f64 = 100_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_image_bounds(w: f64) -> bool { w.is_finite() && w > 0.0 && w <= IMAGE_DIM_MAX }
