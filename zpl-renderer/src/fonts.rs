//! Font mapping table and the process-wide typeface cache.
//!
//! Elements only ever carry `{font_id, height_dots, width_dots, orientation}`
//! — the id is resolved to a typeface at draw time rather than eagerly, so
//! this module is where that resolution happens, backed by `fontdb` for
//! family lookup and `fontdue` for rasterization.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use fontdb::{Database, Family, Query, Weight};
use fontdue::{Font, FontSettings};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontProfile {
    pub bold: bool,
    pub mono: bool,
    pub aspect_ratio: f32,
}

/// The static `font_id → profile` table.
pub fn profile_for(font_id: char) -> FontProfile {
    match font_id.to_ascii_uppercase() {
        '0' => FontProfile { bold: true, mono: false, aspect_ratio: 0.60 },
        'A' => FontProfile { bold: false, mono: true, aspect_ratio: 0.56 },
        'B' => FontProfile { bold: false, mono: false, aspect_ratio: 0.64 },
        'C' | 'D' => FontProfile { bold: false, mono: false, aspect_ratio: 0.56 },
        'E' => FontProfile { bold: false, mono: true, aspect_ratio: 0.54 },
        'F' => FontProfile { bold: false, mono: false, aspect_ratio: 0.50 },
        'G' => FontProfile { bold: true, mono: false, aspect_ratio: 0.67 },
        'H' => FontProfile { bold: false, mono: true, aspect_ratio: 0.62 },
        _ => FontProfile { bold: false, mono: false, aspect_ratio: 0.60 },
    }
}

fn database() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

fn cache() -> &'static RwLock<HashMap<(bool, bool), Option<Font>>> {
    static CACHE: OnceLock<RwLock<HashMap<(bool, bool), Option<Font>>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolves a typeface for `(bold, mono)`, caching the result process-wide.
/// Falls back to a default sans-serif when the requested family can't be
/// resolved, and returns `None` only if the host has no usable fonts at all.
pub fn resolve(bold: bool, mono: bool) -> Option<Font> {
    if let Some(font) = cache().read().unwrap().get(&(bold, mono)) {
        return font.clone();
    }

    let db = database();
    let weight = if bold { Weight::BOLD } else { Weight::NORMAL };
    let primary = if mono { Family::Monospace } else { Family::SansSerif };
    let query = Query { families: &[primary, Family::SansSerif], weight, ..Query::default() };

    let font = db.query(&query).and_then(|id| {
        db.with_face_data(id, |data, _face_index| Font::from_bytes(data, FontSettings::default()).ok())
            .flatten()
    });

    cache().write().unwrap().insert((bold, mono), font.clone());
    font
}
