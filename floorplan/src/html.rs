use crate::algorithms::search::room_id;
use crate::algorithms::placement::{MarkerKind, MarkerPlacement, TooltipSide};
use crate::model::{Biography, CapturedPoint, Landmark, Room};
use crate::registry::Registry;
use std::fmt::Write;

pub const DEFAULT_INSTRUCTIONS: &str = "Clique em uma sala da lista para destacar sua localização";
pub const CAPTURE_INSTRUCTIONS: &str = "Clique em \"Add Coordenada\" para ativar o modo de seleção";
pub const CAPTURE_ACTIVE_INSTRUCTIONS: &str = "Clique no mapa para adicionar uma coordenada";
pub const NO_ROOMS_FOUND: &str = "Nenhuma sala encontrada com esse nome";
pub const EMPTY_DETAILS_HTML: &str =
    "<p class=\"info-message\">Selecione uma sala para ver suas informações</p>";
pub const EMPTY_LIST_HTML: &str = "<p class=\"empty-message\">Nenhuma sala encontrada.</p>";
pub const EMPTY_CAPTURES_HTML: &str =
    "<p class=\"empty-message\">Nenhuma coordenada adicionada ainda.</p>";

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn room_list_html(rooms: &[&Room], selected: Option<&str>) -> String {
    if rooms.is_empty() {
        return EMPTY_LIST_HTML.to_string();
    }
    let mut out = String::new();
    for r in rooms {
        let name = escape(&r.name);
        let class = if selected == Some(r.name.as_str()) { "room-item selected" } else { "room-item" };
        let _ = write!(
            out,
            "<div class=\"{class}\" data-room=\"{name}\" tabindex=\"0\" role=\"button\" \
             aria-label=\"Selecionar sala {name}\" title=\"{title}\">\
             <div class=\"room-header\"><strong class=\"room-name\">{name}</strong>\
             <span class=\"room-hint\">💡</span></div></div>",
            title = escape(r.tooltip()),
        );
    }
    out
}

pub fn biography_html(room: &Room) -> String {
    match &room.biography {
        Some(Biography::Detailed { summary, full, references }) => {
            let id = room_id(&room.name);
            let mut refs = String::new();
            if !references.is_empty() {
                refs.push_str("<div class=\"biography-references\"><h4>Referências:</h4><ul>");
                for r in references {
                    let _ = write!(refs, "<li>{}</li>", escape(r));
                }
                refs.push_str("</ul></div>");
            }
            format!(
                "<div class=\"biography-summary\">{}</div>\
                 <div class=\"biography-expanded\" id=\"biography-expanded-{id}\">{}{refs}</div>\
                 <button class=\"expand-btn\" id=\"expand-btn-{id}\" aria-expanded=\"false\" \
                 aria-controls=\"biography-expanded-{id}\">Ler mais</button>",
                escape(summary),
                escape(full),
            )
        }
        Some(Biography::Plain(text)) => format!("<p class=\"biography-summary\">{}</p>", escape(text)),
        None => String::new(),
    }
}

/// Label of the biography toggle button for the given expanded state.
pub fn expand_label(expanded: bool) -> &'static str {
    if expanded { "Ler menos" } else { "Ler mais" }
}

fn detail_row(out: &mut String, class: &str, label: &str, value: Option<String>) {
    if let Some(v) = value {
        let _ = write!(out, "<div class=\"{class}\"><strong>{label}:</strong> {v}</div>");
    }
}

pub fn room_details_html(room: &Room, floor_label: &str) -> String {
    let name = escape(&room.name);
    let mut out = format!("<div class=\"selected-room-info\"><h3>{name}</h3>");
    detail_row(&mut out, "room-code", "Código", room.code.as_deref().map(escape));
    detail_row(
        &mut out,
        "room-outlook",
        "Outlook",
        room.outlook_code
            .as_deref()
            .map(|c| format!("<span class=\"outlook-code\">{}</span>", escape(c))),
    );
    detail_row(&mut out, "room-capacity", "Capacidade", room.capacity.map(|c| format!("{c} pessoas")));
    detail_row(&mut out, "room-equipment", "Equipamentos", room.equipment.as_deref().map(escape));
    detail_row(&mut out, "room-location", "Andar", Some(escape(floor_label)));
    if room.biography.is_some() {
        let _ = write!(
            out,
            "<div class=\"room-biography\"><strong>Biografia:</strong>{}</div>",
            biography_html(room)
        );
    }
    let _ = write!(
        out,
        "<div class=\"room-actions\">\
         <button class=\"detail-btn\" data-action=\"center\" data-room=\"{name}\">🎯 Centralizar no Mapa</button>\
         <button class=\"detail-btn\" data-action=\"copy\" data-room=\"{name}\">📋 Copiar Informações</button>\
         </div></div>"
    );
    out
}

pub fn room_marker_html(room: &Room, floor_label: &str, side: TooltipSide) -> String {
    let name = escape(&room.name);
    format!(
        "<span class=\"marker-label\">{name}</span>\
         <div class=\"marker-tooltip {classes}\" id=\"tooltip-{id}\"><strong>{name}</strong><br>Andar: {floor}</div>",
        classes = side.css_classes(),
        id = room_id(&room.name),
        floor = escape(floor_label),
    )
}

/// Positioned overlay element wrapping a marker's inner HTML.
pub fn marker_element_html(m: &MarkerPlacement, inner: &str, title: Option<&str>) -> String {
    let (class, data) = match m.kind {
        MarkerKind::Room => ("room-marker", "data-room"),
        MarkerKind::Landmark => ("landmark-marker", "data-landmark"),
        MarkerKind::Capture => ("coordinate-marker", "data-id"),
    };
    let highlight = if m.highlighted { " highlighted blinking" } else { "" };
    let title = title.map(|t| format!(" title=\"{}\"", escape(t))).unwrap_or_default();
    format!(
        "<div class=\"{class}{highlight}\" {data}=\"{key}\" tabindex=\"0\"{title} \
         style=\"left: {left}px; top: {top}px; transform: {transform};\">{inner}</div>",
        key = escape(&m.key),
        left = m.left,
        top = m.top,
        transform = m.anchor.css_transform(),
    )
}

pub fn landmark_marker_html(landmark: &Landmark, key: &str, side: TooltipSide) -> String {
    format!(
        "<span class=\"landmark-emoji\">{emoji}</span>\
         <div class=\"landmark-tooltip {classes}\" id=\"landmark-tooltip-{key}\"><strong>{name}</strong></div>",
        emoji = escape(&landmark.emoji),
        classes = side.css_classes(),
        key = escape(key),
        name = escape(&landmark.name),
    )
}

/// Plain-text summary copied to the clipboard.
pub fn copy_text(room: &Room, floor_label: &str) -> String {
    let mut out = format!("Sala: {}", room.name);
    if let Some(c) = &room.code {
        let _ = write!(out, "\nCódigo: {c}");
    }
    if let Some(c) = &room.outlook_code {
        let _ = write!(out, "\nOutlook: {c}");
    }
    if let Some(c) = room.capacity {
        let _ = write!(out, "\nCapacidade: {c} pessoas");
    }
    if let Some(e) = &room.equipment {
        let _ = write!(out, "\nEquipamentos: {e}");
    }
    let _ = write!(out, "\nAndar: {floor_label}");
    if room.biography.is_some() {
        let _ = write!(out, "\nBiografia: {}", room.tooltip());
    }
    out
}

pub fn capture_list_html(points: &[CapturedPoint], registry: &Registry) -> String {
    if points.is_empty() {
        return EMPTY_CAPTURES_HTML.to_string();
    }
    let mut out = String::new();
    for p in points {
        let _ = write!(
            out,
            "<div class=\"coordinate-item\" data-id=\"{id}\">\
             <div class=\"coordinate-header\"><strong>{name}</strong>\
             <button class=\"remove-btn\" data-id=\"{id}\">&times;</button></div>\
             <div class=\"coordinate-details\">\
             <span class=\"coordinate-position\">X: {x}, Y: {y}</span>\
             <span class=\"coordinate-floor\">{floor}</span></div></div>",
            id = p.id,
            name = escape(&p.name),
            x = p.position.x,
            y = p.position.y,
            floor = escape(registry.floor_label(&p.floor)),
        );
    }
    out
}

pub fn capture_marker_title(p: &CapturedPoint) -> String {
    format!("{} ({}, {})", p.name, p.position.x, p.position.y)
}

/// Footer fragment: ` • <n> visita` for one visit, `visitas` otherwise.
pub fn visit_label_html(visits: u64) -> String {
    let noun = if visits == 1 { "visita" } else { "visitas" };
    format!(" • <span class=\"visit-number\">{visits}</span> {noun}")
}

pub fn found_rooms_message(count: usize) -> String {
    format!("{count} sala(s) encontrada(s)")
}
