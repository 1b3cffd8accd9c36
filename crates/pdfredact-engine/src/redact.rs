//! Destructive content stream rewriting.
//!
//! Replays a page's operations with the same [`TextCursor`] the
//! extractor uses, so every shown glyph lands on the same box the
//! resolver saw. Glyphs whose boxes intersect a marked region are
//! removed from the show operation; surviving glyphs keep their exact
//! positions because each removed glyph's advance is replaced by an
//! equivalent `TJ` positioning adjustment. Opaque fill rectangles are
//! appended after the original operations.

use lopdf::content::Operation;
use lopdf::{Object, StringFormat};
use pdfredact_core::{FillColor, Region};
use tracing::warn;

use crate::extract::string_bytes;
use crate::fonts::{FontInfo, FontTable};
use crate::page_geometry::PageGeometry;
use crate::text_state::{TextCursor, number};

/// A region queued for removal on some page, with its cover color.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PendingMark {
    pub region: Region,
    pub fill: FillColor,
}

/// Rewrite a page's operations, removing every glyph that intersects a
/// mark. Returns the new operation list and the number of glyphs
/// removed.
pub(crate) fn rewrite_content(
    ops: &[Operation],
    fonts: &FontTable,
    geometry: &PageGeometry,
    marks: &[PendingMark],
    page_index: usize,
) -> (Vec<Operation>, usize) {
    let mut cursor = TextCursor::new();
    let fallback = FontInfo::fallback();
    let mut out = Vec::with_capacity(ops.len() + marks.len() * 5);
    let mut removed_total = 0;
    let mut warned_multibyte = false;

    for op in ops {
        if cursor.apply_state_op(op) {
            out.push(op.clone());
            continue;
        }

        let font = cursor
            .font_name()
            .and_then(|name| fonts.get(name))
            .unwrap_or(&fallback);
        if font.is_multibyte() {
            // Cannot glyph-split multi-byte encodings; removing the
            // whole operation is the only way to guarantee nothing
            // under a mark survives.
            if !warned_multibyte {
                warn!(
                    page = page_index,
                    "dropping composite-font text during redaction; glyph-level removal \
                     is not possible for Type0 fonts"
                );
                warned_multibyte = true;
            }
            removed_total += 1;
            continue;
        }

        match op.operator.as_str() {
            "Tj" => {
                let Some(bytes) = string_bytes(op.operands.first()) else {
                    out.push(op.clone());
                    continue;
                };
                let mut elements = Vec::new();
                let removed =
                    partition_bytes(&mut cursor, font, bytes, geometry, marks, &mut elements);
                if removed == 0 {
                    out.push(op.clone());
                } else {
                    out.push(Operation::new("TJ", vec![Object::Array(elements)]));
                    removed_total += removed;
                }
            }
            "'" => {
                cursor.next_line();
                let Some(bytes) = string_bytes(op.operands.first()) else {
                    out.push(op.clone());
                    continue;
                };
                let mut elements = Vec::new();
                let removed =
                    partition_bytes(&mut cursor, font, bytes, geometry, marks, &mut elements);
                if removed == 0 {
                    out.push(op.clone());
                } else {
                    out.push(Operation::new("T*", vec![]));
                    out.push(Operation::new("TJ", vec![Object::Array(elements)]));
                    removed_total += removed;
                }
            }
            "\"" => {
                let aw = op.operands.first().and_then(number).unwrap_or(0.0);
                let ac = op.operands.get(1).and_then(number).unwrap_or(0.0);
                cursor.set_word_spacing(aw);
                cursor.set_char_spacing(ac);
                cursor.next_line();
                let Some(bytes) = string_bytes(op.operands.get(2)) else {
                    out.push(op.clone());
                    continue;
                };
                let mut elements = Vec::new();
                let removed =
                    partition_bytes(&mut cursor, font, bytes, geometry, marks, &mut elements);
                if removed == 0 {
                    out.push(op.clone());
                } else {
                    out.push(Operation::new("Tw", vec![Object::Real(aw as f32)]));
                    out.push(Operation::new("Tc", vec![Object::Real(ac as f32)]));
                    out.push(Operation::new("T*", vec![]));
                    out.push(Operation::new("TJ", vec![Object::Array(elements)]));
                    removed_total += removed;
                }
            }
            "TJ" => {
                let Some(Object::Array(source)) = op.operands.first() else {
                    out.push(op.clone());
                    continue;
                };
                let mut elements = Vec::new();
                let mut removed = 0;
                for element in source {
                    match element {
                        Object::String(bytes, _) => {
                            removed += partition_bytes(
                                &mut cursor,
                                font,
                                bytes,
                                geometry,
                                marks,
                                &mut elements,
                            );
                        }
                        other => {
                            if let Some(adj) = number(other) {
                                cursor.adjust(adj);
                            }
                            elements.push(other.clone());
                        }
                    }
                }
                if removed == 0 {
                    out.push(op.clone());
                } else {
                    out.push(Operation::new("TJ", vec![Object::Array(elements)]));
                    removed_total += removed;
                }
            }
            _ => out.push(op.clone()),
        }
    }

    for mark in marks {
        append_fill(&mut out, geometry, mark);
    }
    (out, removed_total)
}

/// Show a string's glyphs through the cursor, splitting it into kept
/// byte runs and positioning adjustments covering removed glyphs.
/// Appends `TJ` array elements to `elements` and returns the number of
/// glyphs removed.
fn partition_bytes(
    cursor: &mut TextCursor,
    font: &FontInfo,
    bytes: &[u8],
    geometry: &PageGeometry,
    marks: &[PendingMark],
    elements: &mut Vec<Object>,
) -> usize {
    let mut kept: Vec<u8> = Vec::new();
    let mut gap = 0.0_f64;
    let mut removed = 0;

    for &byte in bytes {
        let width = font.width(byte as u32);
        let size = cursor.font_size();
        let h_scale = cursor.h_scale();
        let placed = cursor.show_glyph(width, byte == b' ', geometry);

        if marks.iter().any(|m| m.region.intersects(&placed.bbox)) {
            removed += 1;
            if !kept.is_empty() {
                elements.push(Object::String(
                    std::mem::take(&mut kept),
                    StringFormat::Literal,
                ));
            }
            if size > 0.0 && h_scale > 0.0 {
                gap += placed.advance * 1000.0 / (size * h_scale);
            }
        } else {
            if gap != 0.0 {
                elements.push(Object::Real(-gap as f32));
                gap = 0.0;
            }
            kept.push(byte);
        }
    }

    if !kept.is_empty() {
        elements.push(Object::String(kept, StringFormat::Literal));
    }
    // A trailing adjustment keeps later shows in the same text object
    // at their original positions.
    if gap != 0.0 {
        elements.push(Object::Real(-gap as f32));
    }
    removed
}

/// Emit an opaque rectangle covering the mark, in PDF coordinates.
fn append_fill(out: &mut Vec<Operation>, geometry: &PageGeometry, mark: &PendingMark) {
    let (x, y, w, h) = geometry.pdf_rect(&mark.region);
    out.push(Operation::new("q", vec![]));
    out.push(Operation::new(
        "rg",
        vec![
            Object::Real(mark.fill.r as f32),
            Object::Real(mark.fill.g as f32),
            Object::Real(mark.fill.b as f32),
        ],
    ));
    out.push(Operation::new(
        "re",
        vec![
            Object::Real(x as f32),
            Object::Real(y as f32),
            Object::Real(w as f32),
            Object::Real(h as f32),
        ],
    ));
    out.push(Operation::new("f", vec![]));
    out.push(Operation::new("Q", vec![]));
}
