use std::cmp::Ordering;

/// Folds the Portuguese accented vowels and cedilla to plain ASCII letters.
pub fn fold_accents(c: char) -> char {
    match c {
        'á' | 'â' | 'ã' | 'à' => 'a',
        'Á' | 'Â' | 'Ã' | 'À' => 'A',
        'é' | 'ê' | 'è' => 'e',
        'É' | 'Ê' | 'È' => 'E',
        'í' | 'î' | 'ì' => 'i',
        'Í' | 'Î' | 'Ì' => 'I',
        'ó' | 'ô' | 'õ' | 'ò' => 'o',
        'Ó' | 'Ô' | 'Õ' | 'Ò' => 'O',
        'ú' | 'û' | 'ù' => 'u',
        'Ú' | 'Û' | 'Ù' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        other => other,
    }
}

/// Stable identifier for a room name: `"Sala de Reunião 1"` -> `"sala-de-reuniao-1"`.
pub fn room_id(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars().flat_map(char::to_lowercase).map(fold_accents) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c);
        } else {
            pending_dash = true;
        }
    }
    out
}

fn collation_key(name: &str) -> String {
    name.chars().flat_map(char::to_lowercase).map(fold_accents).collect()
}

/// Alphabetical order for the room list: accent- and case-insensitive,
/// falling back to the raw text so the order is total.
pub fn name_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

/// Case-insensitive substring match; the query is trimmed and an empty
/// query matches everything.
pub fn matches_query(name: &str, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    q.is_empty() || name.to_lowercase().contains(&q)
}

/// Next index in a list of `len` entries moving by `direction`, wrapping at
/// both ends. With no current entry, forward starts at the first entry and
/// backward at the last.
pub fn step_index(current: Option<usize>, len: usize, direction: i32) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len as i64 - 1;
    let next = match current {
        Some(i) if (i as i64) <= last => i as i64 + direction.signum() as i64,
        _ => {
            if direction >= 0 {
                0
            } else {
                last
            }
        }
    };
    Some(if next < 0 {
        last as usize
    } else if next > last {
        0
    } else {
        next as usize
    })
}
