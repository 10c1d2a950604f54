use crate::error::{Error, Result};
use crate::geometry::limits;
use crate::geometry::tolerance::{clamp, safe_div, snap_step, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::model::{Point, Size};
use serde::{Deserialize, Serialize};

/// Ratio between the displayed floor image and its native resolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub natural: Size,
    pub displayed: Size,
    pub sx: f64,
    pub sy: f64,
}

fn check_size(which: &'static str, s: Size) -> Result<()> {
    if limits::in_image_bounds(s.width) && limits::in_image_bounds(s.height) {
        Ok(())
    } else {
        Err(Error::InvalidSize { which, width: s.width, height: s.height })
    }
}

impl Scale {
    pub fn new(natural: Size, displayed: Size) -> Result<Scale> {
        check_size("natural", natural)?;
        check_size("displayed", displayed)?;
        Ok(Scale {
            natural,
            displayed,
            sx: displayed.width / natural.width,
            sy: displayed.height / natural.height,
        })
    }

    /// Image shown at its native resolution.
    pub fn identity(natural: Size) -> Result<Scale> {
        Scale::new(natural, natural)
    }

    /// Same image with an extra CSS zoom applied on top of the layout size.
    pub fn with_zoom(&self, zoom: f64) -> Scale {
        let z = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        Scale {
            natural: self.natural,
            displayed: Size::new(self.displayed.width * z, self.displayed.height * z),
            sx: self.sx * z,
            sy: self.sy * z,
        }
    }

    pub fn to_display(&self, p: Point) -> Point {
        Point::new(p.x * self.sx, p.y * self.sy)
    }

    /// Maps a click on the displayed image back to whole native pixels.
    pub fn to_natural(&self, p: Point) -> Point {
        Point::new(
            safe_div(p.x, self.sx, 0.0).round(),
            safe_div(p.y, self.sy, 0.0).round(),
        )
    }

    pub fn natural_aspect(&self) -> f64 {
        self.natural.width / self.natural.height
    }

    pub fn displayed_aspect(&self) -> f64 {
        self.displayed.width / self.displayed.height
    }

    /// True when the layout stretched the image non-uniformly.
    pub fn is_distorted(&self, eps: f64) -> bool {
        (self.natural_aspect() - self.displayed_aspect()).abs() > eps
    }
}

/// Zoom level applied to the floor plan, clamped to a configurable range.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    value: f64,
    min: f64,
    max: f64,
    step: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Zoom { value: 1.0, min: ZOOM_MIN, max: ZOOM_MAX, step: ZOOM_STEP }
    }
}

impl Zoom {
    pub fn with_bounds(min: f64, max: f64, step: f64) -> Zoom {
        let (min, max) = if min.is_finite() && max.is_finite() && min > 0.0 && min <= max {
            (min, max)
        } else {
            (ZOOM_MIN, ZOOM_MAX)
        };
        let step = if step.is_finite() && step > 0.0 { step } else { ZOOM_STEP };
        Zoom { value: clamp(1.0, min, max), min, max, step }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Non-finite input keeps the current level.
    pub fn set(&mut self, z: f64) -> f64 {
        if z.is_finite() {
            self.value = clamp(snap_step(z), self.min, self.max);
        }
        self.value
    }

    /// Nearest level on the `min + n * step` grid.
    fn on_grid(&self, z: f64) -> f64 {
        let n = ((z - self.min) / self.step).round();
        snap_step(self.min + n * self.step)
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.set(self.on_grid(self.value + self.step))
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.set(self.on_grid(self.value - self.step))
    }

    pub fn percent(&self) -> u32 {
        (self.value * 100.0).round() as u32
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}
