use crate::geometry::scale::Scale;
use crate::model::{CapturedPoint, Landmark, Point, Room, Size};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Room,
    Landmark,
    Capture,
}

/// CSS translate applied so the right point of the marker sits on the coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Centre on the coordinate.
    Center,
    /// Right edge of the emoji on the coordinate.
    RightEdge,
    TopLeft,
}

impl Anchor {
    pub fn css_transform(&self) -> &'static str {
        match self {
            Anchor::Center => "translate(-50%, -50%)",
            Anchor::RightEdge => "translate(-220%, -0%)",
            Anchor::TopLeft => "none",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizontal {
    Left,
    Right,
    #[default]
    Center,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vertical {
    Top,
    Bottom,
    #[default]
    Middle,
}

/// Side on which a marker tooltip opens so it stays inside the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipSide {
    pub horizontal: Horizontal,
    pub vertical: Vertical,
}

impl TooltipSide {
    pub fn for_position(p: Point, area: Size, threshold: f64) -> TooltipSide {
        let horizontal = if p.x < threshold {
            Horizontal::Right
        } else if p.x > area.width - threshold {
            Horizontal::Left
        } else {
            Horizontal::Center
        };
        let vertical = if p.y < threshold {
            Vertical::Bottom
        } else if p.y > area.height - threshold {
            Vertical::Top
        } else {
            Vertical::Middle
        };
        TooltipSide { horizontal, vertical }
    }

    /// Extra classes on the tooltip element, e.g. `"right bottom"`.
    pub fn css_classes(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        match self.horizontal {
            Horizontal::Left => parts.push("left"),
            Horizontal::Right => parts.push("right"),
            Horizontal::Center => {}
        }
        match self.vertical {
            Vertical::Top => parts.push("top"),
            Vertical::Bottom => parts.push("bottom"),
            Vertical::Middle => {}
        }
        parts.join(" ")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerPlacement {
    pub kind: MarkerKind,
    /// `data-*` key: room name, `"<name>-<index>"` for landmarks, capture id.
    pub key: String,
    pub label: String,
    /// Unrounded display position, used for hit-testing.
    pub x: f64,
    pub y: f64,
    /// Whole-pixel CSS position.
    pub left: i64,
    pub top: i64,
    pub anchor: Anchor,
    pub highlighted: bool,
    pub tooltip: TooltipSide,
}

fn placement(
    kind: MarkerKind,
    key: String,
    label: String,
    display: Point,
    area: Size,
    anchor: Anchor,
    highlighted: bool,
    threshold: f64,
) -> MarkerPlacement {
    MarkerPlacement {
        kind,
        key,
        label,
        x: display.x,
        y: display.y,
        left: display.x.round() as i64,
        top: display.y.round() as i64,
        anchor,
        highlighted,
        tooltip: TooltipSide::for_position(display, area, threshold),
    }
}

pub fn place_room(room: &Room, scale: &Scale, highlighted: bool, threshold: f64) -> MarkerPlacement {
    let d = scale.to_display(room.position);
    log::debug!(
        "marker {} at ({:.1}, {:.1}) from ({}, {})",
        room.name,
        d.x,
        d.y,
        room.position.x,
        room.position.y
    );
    placement(
        MarkerKind::Room,
        room.name.clone(),
        room.name.clone(),
        d,
        scale.displayed,
        Anchor::Center,
        highlighted,
        threshold,
    )
}

pub fn place_rooms<'a>(
    rooms: impl IntoIterator<Item = &'a Room>,
    scale: &Scale,
    highlighted: Option<&str>,
    threshold: f64,
) -> Vec<MarkerPlacement> {
    rooms
        .into_iter()
        .map(|r| place_room(r, scale, highlighted == Some(r.name.as_str()), threshold))
        .collect()
}

pub fn place_landmarks(landmarks: &[Landmark], scale: &Scale, threshold: f64) -> Vec<MarkerPlacement> {
    landmarks
        .iter()
        .enumerate()
        .map(|(i, l)| {
            placement(
                MarkerKind::Landmark,
                format!("{}-{}", l.name, i),
                l.name.clone(),
                scale.to_display(l.position),
                scale.displayed,
                Anchor::RightEdge,
                false,
                threshold,
            )
        })
        .collect()
}

/// Capture markers keep the display position recorded at click time when
/// present; loaded points are scaled from their stored coordinate.
pub fn place_captures<'a>(
    points: impl IntoIterator<Item = &'a CapturedPoint>,
    scale: &Scale,
) -> Vec<MarkerPlacement> {
    points
        .into_iter()
        .map(|p| {
            let d = p.display.unwrap_or_else(|| scale.to_display(p.position));
            placement(
                MarkerKind::Capture,
                p.id.to_string(),
                p.name.clone(),
                d,
                scale.displayed,
                Anchor::TopLeft,
                false,
                0.0,
            )
        })
        .collect()
}

/// Vertical scroll offset of the map wrapper that brings `room` to the
/// middle of a `viewport` tall view. Never negative.
pub fn center_scroll(room: &Room, scale: &Scale, viewport: Size) -> f64 {
    let d = scale.to_display(room.position);
    (d.y - viewport.height / 2.0).max(0.0)
}
