// Centralized tolerances and helpers for scale arithmetic

pub const EPS_SCALE: f64 = 1e-9;          // smallest usable scale factor
pub const EPS_POS: f64 = 1e-6;            // point coincidence threshold (px)

pub const ZOOM_MIN: f64 = 0.5;
pub const ZOOM_MAX: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_SCALE { fallback } else { num/den }
}

/// Rounds away float noise from repeated step additions (0.1 + 0.2 ...)
/// without collapsing steps finer than a hundredth.
#[inline]
pub fn snap_step(x: f64) -> f64 { (x * 1e9).round() / 1e9 }
