use crate::algorithms::placement::{MarkerKind, MarkerPlacement};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pick {
    pub kind: MarkerKind,
    pub key: String,
    pub dist: f64,
}

fn nearest(markers: &[MarkerPlacement], kind: MarkerKind, x: f64, y: f64, tol2: f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, m) in markers.iter().enumerate() {
        if m.kind != kind { continue; }
        let dx = m.x - x; let dy = m.y - y; let d2 = dx*dx + dy*dy;
        if d2 <= tol2 && best.map_or(true, |(_, bd)| d2 < bd) { best = Some((i, d2)); }
    }
    best
}

/// Marker under a display-space point. Rooms win over landmarks, landmarks
/// over capture markers; within a kind the closest one wins.
pub fn pick_impl(markers: &[MarkerPlacement], x: f64, y: f64, tol: f64) -> Option<Pick> {
    if !x.is_finite() || !y.is_finite() || !tol.is_finite() || tol < 0.0 { return None; }
    let tol2 = tol*tol;
    for kind in [MarkerKind::Room, MarkerKind::Landmark, MarkerKind::Capture] {
        if let Some((i, d2)) = nearest(markers, kind, x, y, tol2) {
            return Some(Pick { kind, key: markers[i].key.clone(), dist: d2.sqrt() });
        }
    }
    None
}
