//! Glyph width tables from page font resources.
//!
//! Parses /Widths, /FirstChar, and /FontDescriptor//MissingWidth for
//! the simple font types (Type1, TrueType, Type3). Composite (Type0)
//! fonts use multi-byte encodings this engine does not decode; they
//! are flagged so callers can skip or drop their show operations.

use std::collections::HashMap;

use lopdf::{Document, Object, ObjectId};
use tracing::debug;

use crate::objects::{object_to_f64, page_resources, resolve_ref};

/// Fallback glyph width in thousandths of text space, used when a font
/// carries no /Widths entry for a code.
pub const DEFAULT_WIDTH: f64 = 600.0;

/// Width metrics for one font resource.
#[derive(Debug, Clone)]
pub struct FontInfo {
    widths: Vec<f64>,
    first_char: u32,
    missing_width: f64,
    multibyte: bool,
}

impl FontInfo {
    /// Metrics used when a show op names a font the resources do not
    /// define.
    pub fn fallback() -> Self {
        Self {
            widths: Vec::new(),
            first_char: 0,
            missing_width: DEFAULT_WIDTH,
            multibyte: false,
        }
    }

    /// Whether the font uses a multi-byte encoding (Type0 composite).
    pub fn is_multibyte(&self) -> bool {
        self.multibyte
    }

    /// Width of a character code in thousandths of text space.
    pub fn width(&self, code: u32) -> f64 {
        if code >= self.first_char {
            if let Some(w) = self.widths.get((code - self.first_char) as usize) {
                return *w;
            }
        }
        self.missing_width
    }
}

/// All fonts reachable from a page's /Resources/Font dictionary,
/// keyed by resource name.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    fonts: HashMap<String, FontInfo>,
}

impl FontTable {
    pub fn get(&self, name: &str) -> Option<&FontInfo> {
        self.fonts.get(name)
    }
}

/// Load the font table for a page. Malformed or missing font entries
/// degrade to fallback metrics rather than failing the page.
pub fn load_page_fonts(doc: &Document, page_id: ObjectId) -> FontTable {
    let mut table = FontTable::default();

    let resources = match page_resources(doc, page_id) {
        Ok(Some(dict)) => dict,
        Ok(None) => return table,
        Err(e) => {
            debug!(error = %e, "failed to resolve page resources; using fallback font metrics");
            return table;
        }
    };

    let font_dict = match resources.get(b"Font").map(|obj| resolve_ref(doc, obj)) {
        Ok(Object::Dictionary(dict)) => dict,
        _ => return table,
    };

    for (name, entry) in font_dict.iter() {
        let name = String::from_utf8_lossy(name).into_owned();
        match resolve_ref(doc, entry).as_dict() {
            Ok(dict) => {
                table.fonts.insert(name, parse_font(doc, dict));
            }
            Err(_) => {
                debug!(font = %name, "font resource is not a dictionary; using fallback metrics");
                table.fonts.insert(name, FontInfo::fallback());
            }
        }
    }
    table
}

fn parse_font(doc: &Document, font: &lopdf::Dictionary) -> FontInfo {
    let multibyte = matches!(font.get(b"Subtype"), Ok(Object::Name(s)) if s == b"Type0");

    let first_char = font
        .get(b"FirstChar")
        .ok()
        .and_then(|o| object_to_f64(doc, o))
        .map(|v| v as u32)
        .unwrap_or(0);

    let widths = font
        .get(b"Widths")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|arr| {
            arr.iter()
                .map(|w| object_to_f64(doc, w).unwrap_or(DEFAULT_WIDTH))
                .collect()
        })
        .unwrap_or_default();

    let missing_width = font
        .get(b"FontDescriptor")
        .ok()
        .map(|o| resolve_ref(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|desc| desc.get(b"MissingWidth").ok())
        .and_then(|o| object_to_f64(doc, o))
        .unwrap_or(DEFAULT_WIDTH);

    FontInfo {
        widths,
        first_char,
        missing_width,
        multibyte,
    }
}
