//! Content stream interpretation and page text assembly.
//!
//! Walks a page's operations with a [`TextCursor`], decoding each shown
//! byte into a positioned [`Glyph`], then clusters the resulting runs
//! into lines and blocks. Separator glyphs are inserted between runs
//! (a space where a horizontal gap suggests one, a newline between
//! lines) so the assembled raw text concatenates exactly from the
//! glyph stream.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use pdfredact_core::{Glyph, LayoutBlock, LayoutLine, PageContent, PageLayout, Region, TextSpan};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::fonts::{FontInfo, FontTable, load_page_fonts};
use crate::objects::{object_to_f64, resolve_inherited, resolve_ref};
use crate::page_geometry::PageGeometry;
use crate::text_state::{TextCursor, number};

/// US Letter fallback when a page has no resolvable MediaBox.
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Horizontal gap between runs, as a fraction of line height, above
/// which a space separator is inserted.
const SPACE_GAP_RATIO: f64 = 0.2;

/// Vertical gap between lines, as a fraction of the previous line's
/// height, above which a new block starts.
const BLOCK_GAP_RATIO: f64 = 0.5;

/// Page geometry from the (possibly inherited) MediaBox.
pub(crate) fn page_geometry(doc: &Document, page_id: ObjectId) -> PageGeometry {
    let media_box = resolve_inherited(doc, page_id, b"MediaBox")
        .ok()
        .flatten()
        .map(|obj| resolve_ref(doc, obj))
        .and_then(|obj| obj.as_array().ok())
        .and_then(|arr| {
            let nums: Vec<f64> = arr.iter().filter_map(|o| object_to_f64(doc, o)).collect();
            <[f64; 4]>::try_from(nums).ok()
        });
    match media_box {
        Some(rect) => PageGeometry::new(rect),
        None => {
            debug!("page has no usable MediaBox; assuming US Letter");
            PageGeometry::new(DEFAULT_MEDIA_BOX)
        }
    }
}

/// Extract the full content model for one page.
pub(crate) fn extract_page(
    doc: &Document,
    page_id: ObjectId,
    index: usize,
) -> Result<PageContent, EngineError> {
    let rotation = resolve_inherited(doc, page_id, b"Rotate")
        .ok()
        .flatten()
        .and_then(|obj| object_to_f64(doc, obj))
        .unwrap_or(0.0);
    if rotation != 0.0 {
        debug!(page = index, rotation, "page rotation is not interpreted");
    }

    let geometry = page_geometry(doc, page_id);
    let content_bytes = doc.get_page_content(page_id)?;
    let content = Content::decode(&content_bytes)?;
    let fonts = load_page_fonts(doc, page_id);
    let runs = collect_runs(&content.operations, &fonts, &geometry, index);
    Ok(assemble_page(index, runs, &geometry))
}

/// Glyphs produced by one show operation, in show order.
pub(crate) struct GlyphRun {
    pub glyphs: Vec<Glyph>,
}

/// Interpret the operation list, producing one glyph run per show op.
pub(crate) fn collect_runs(
    ops: &[Operation],
    fonts: &FontTable,
    geometry: &PageGeometry,
    page_index: usize,
) -> Vec<GlyphRun> {
    let mut cursor = TextCursor::new();
    let fallback = FontInfo::fallback();
    let mut runs = Vec::new();
    let mut warned_multibyte = false;

    for op in ops {
        if cursor.apply_state_op(op) {
            continue;
        }

        let font = cursor
            .font_name()
            .and_then(|name| fonts.get(name))
            .unwrap_or(&fallback);
        if font.is_multibyte() {
            if !warned_multibyte {
                warn!(
                    page = page_index,
                    "composite (Type0) font encountered; its text cannot be extracted"
                );
                warned_multibyte = true;
            }
            continue;
        }

        let mut glyphs = Vec::new();
        match op.operator.as_str() {
            "Tj" => {
                if let Some(bytes) = string_bytes(op.operands.first()) {
                    show_bytes(&mut cursor, font, bytes, geometry, &mut glyphs);
                }
            }
            "'" => {
                cursor.next_line();
                if let Some(bytes) = string_bytes(op.operands.first()) {
                    show_bytes(&mut cursor, font, bytes, geometry, &mut glyphs);
                }
            }
            "\"" => {
                if let Some(aw) = op.operands.first().and_then(number) {
                    cursor.set_word_spacing(aw);
                }
                if let Some(ac) = op.operands.get(1).and_then(number) {
                    cursor.set_char_spacing(ac);
                }
                cursor.next_line();
                if let Some(bytes) = string_bytes(op.operands.get(2)) {
                    show_bytes(&mut cursor, font, bytes, geometry, &mut glyphs);
                }
            }
            "TJ" => {
                if let Some(Object::Array(elements)) = op.operands.first() {
                    for element in elements {
                        match element {
                            Object::String(bytes, _) => {
                                show_bytes(&mut cursor, font, bytes, geometry, &mut glyphs);
                            }
                            other => {
                                if let Some(adj) = number(other) {
                                    cursor.adjust(adj);
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }

        if !glyphs.is_empty() {
            runs.push(GlyphRun { glyphs });
        }
    }
    runs
}

pub(crate) fn string_bytes(operand: Option<&Object>) -> Option<&[u8]> {
    match operand {
        Some(Object::String(bytes, _)) => Some(bytes),
        _ => None,
    }
}

fn show_bytes(
    cursor: &mut TextCursor,
    font: &FontInfo,
    bytes: &[u8],
    geometry: &PageGeometry,
    out: &mut Vec<Glyph>,
) {
    for &byte in bytes {
        let width = font.width(byte as u32);
        let placed = cursor.show_glyph(width, byte == b' ', geometry);
        let buf = [byte];
        let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&buf);
        out.push(Glyph::new(text.into_owned(), placed.bbox));
    }
}

/// Cluster runs into lines and blocks, insert separators, and build the
/// final page content. Runs are re-ordered top-to-bottom, then
/// left-to-right within a line.
pub(crate) fn assemble_page(
    index: usize,
    runs: Vec<GlyphRun>,
    geometry: &PageGeometry,
) -> PageContent {
    let mut items: Vec<(Region, Vec<Glyph>)> = runs
        .into_iter()
        .filter(|run| !run.glyphs.is_empty())
        .map(|run| {
            let bbox = run
                .glyphs
                .iter()
                .skip(1)
                .fold(run.glyphs[0].bbox, |acc, g| acc.union(&g.bbox));
            (bbox, run.glyphs)
        })
        .collect();

    items.sort_by(|a, b| {
        a.0.top
            .partial_cmp(&b.0.top)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                a.0.x0
                    .partial_cmp(&b.0.x0)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
    });

    // Group into lines by vertical overlap with the accumulated line box.
    let mut lines: Vec<(Region, Vec<(Region, Vec<Glyph>)>)> = Vec::new();
    for (bbox, glyphs) in items {
        match lines.last_mut() {
            Some((line_bbox, members)) if bbox.same_line(line_bbox) => {
                *line_bbox = line_bbox.union(&bbox);
                members.push((bbox, glyphs));
            }
            _ => lines.push((bbox, vec![(bbox, glyphs)])),
        }
    }
    for (_, members) in &mut lines {
        members.sort_by(|a, b| {
            a.0.x0
                .partial_cmp(&b.0.x0)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let mut page = PageContent::empty(index, geometry.width(), geometry.height());
    let mut blocks: Vec<LayoutBlock> = Vec::new();
    let mut prev_line_bbox: Option<Region> = None;

    for (line_bbox, members) in lines {
        let start_new_block = match prev_line_bbox {
            None => true,
            Some(prev) => {
                page.glyphs.push(Glyph::separator("\n", prev.x1, prev.bottom));
                line_bbox.top - prev.bottom > BLOCK_GAP_RATIO * prev.height()
            }
        };
        if start_new_block {
            blocks.push(LayoutBlock {
                lines: Vec::new(),
                bbox: line_bbox,
            });
        }

        let mut spans = Vec::new();
        let mut prev_span: Option<Region> = None;
        for (bbox, glyphs) in members {
            if let Some(prev) = prev_span {
                let gap = bbox.x0 - prev.x1;
                if gap > SPACE_GAP_RATIO * line_bbox.height() {
                    page.glyphs.push(Glyph::separator(" ", prev.x1, prev.top));
                }
            }
            let text: String = glyphs.iter().map(|g| g.text.as_str()).collect();
            spans.push(TextSpan { text, bbox });
            page.glyphs.extend(glyphs);
            prev_span = Some(bbox);
        }

        if let Some(block) = blocks.last_mut() {
            block.bbox = block.bbox.union(&line_bbox);
            block.lines.push(LayoutLine {
                spans,
                bbox: line_bbox,
            });
        }
        prev_line_bbox = Some(line_bbox);
    }

    page.raw_text = page.glyphs.iter().map(|g| g.text.as_str()).collect();
    page.layout = PageLayout { blocks };
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::Operation;

    fn geo() -> PageGeometry {
        PageGeometry::new([0.0, 0.0, 612.0, 792.0])
    }

    fn op(operator: &str, operands: Vec<Object>) -> Operation {
        Operation::new(operator, operands)
    }

    fn literal(text: &str) -> Object {
        Object::string_literal(text)
    }

    fn text_ops(prefix: Vec<Operation>) -> Vec<Operation> {
        let mut ops = vec![
            op("BT", vec![]),
            op(
                "Tf",
                vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
            ),
        ];
        ops.extend(prefix);
        ops.push(op("ET", vec![]));
        ops
    }

    fn extract(ops: &[Operation]) -> PageContent {
        let runs = collect_runs(ops, &FontTable::default(), &geo(), 0);
        assemble_page(0, runs, &geo())
    }

    #[test]
    fn single_show_op_round_trips_text() {
        let ops = text_ops(vec![
            op("Td", vec![Object::Integer(72), Object::Integer(720)]),
            op("Tj", vec![literal("Hello")]),
        ]);
        let page = extract(&ops);
        assert_eq!(page.raw_text, "Hello");
        assert_eq!(page.glyphs.len(), 5);
        assert!(page.glyphs.iter().all(|g| !g.synthetic));
        assert_eq!(page.layout.blocks.len(), 1);
        assert_eq!(page.layout.blocks[0].lines.len(), 1);
    }

    #[test]
    fn two_lines_get_newline_separator() {
        let ops = text_ops(vec![
            op("TL", vec![Object::Integer(14)]),
            op("Td", vec![Object::Integer(72), Object::Integer(720)]),
            op("Tj", vec![literal("first")]),
            op("T*", vec![]),
            op("Tj", vec![literal("second")]),
        ]);
        let page = extract(&ops);
        assert_eq!(page.raw_text, "first\nsecond");
        let newline = page.glyphs.iter().find(|g| g.text == "\n");
        assert!(newline.is_some_and(|g| g.synthetic));
    }

    #[test]
    fn adjacent_fragments_join_without_space() {
        // Kerned fragments of one word, split across TJ elements.
        let ops = text_ops(vec![
            op("Td", vec![Object::Integer(72), Object::Integer(720)]),
            op(
                "TJ",
                vec![Object::Array(vec![
                    literal("Ac"),
                    Object::Integer(-20),
                    literal("me"),
                ])],
            ),
        ]);
        let page = extract(&ops);
        assert_eq!(page.raw_text, "Acme");
    }

    #[test]
    fn distant_runs_on_one_line_get_space_separator() {
        let ops = text_ops(vec![
            op("Td", vec![Object::Integer(72), Object::Integer(720)]),
            op("Tj", vec![literal("left")]),
            op("Td", vec![Object::Integer(200), Object::Integer(0)]),
            op("Tj", vec![literal("right")]),
        ]);
        let page = extract(&ops);
        assert_eq!(page.raw_text, "left right");
        let sep = page.glyphs.iter().find(|g| g.synthetic).map(|g| &g.text);
        assert_eq!(sep, Some(&" ".to_string()));
    }

    #[test]
    fn quote_operator_advances_line_before_showing() {
        let ops = text_ops(vec![
            op("TL", vec![Object::Integer(14)]),
            op("Td", vec![Object::Integer(72), Object::Integer(720)]),
            op("Tj", vec![literal("head")]),
            op("'", vec![literal("tail")]),
        ]);
        let page = extract(&ops);
        assert_eq!(page.raw_text, "head\ntail");
    }

    #[test]
    fn wide_vertical_gap_starts_new_block() {
        let ops = text_ops(vec![
            op("Td", vec![Object::Integer(72), Object::Integer(720)]),
            op("Tj", vec![literal("top")]),
            op("Td", vec![Object::Integer(0), Object::Integer(-200)]),
            op("Tj", vec![literal("bottom")]),
        ]);
        let page = extract(&ops);
        assert_eq!(page.layout.blocks.len(), 2);
        assert_eq!(page.raw_text, "top\nbottom");
    }

    #[test]
    fn empty_content_yields_empty_page() {
        let page = extract(&[]);
        assert!(page.raw_text.is_empty());
        assert!(page.glyphs.is_empty());
    }

    #[test]
    fn glyph_stream_concatenates_to_raw_text() {
        let ops = text_ops(vec![
            op("TL", vec![Object::Integer(14)]),
            op("Td", vec![Object::Integer(72), Object::Integer(720)]),
            op("Tj", vec![literal("SSN: 555-12-3456")]),
            op("T*", vec![]),
            op("Tj", vec![literal("Jane Q. Public")]),
        ]);
        let page = extract(&ops);
        let joined: String = page.glyphs.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(joined, page.raw_text);
        assert!(page.raw_text.contains("555-12-3456"));
    }
}
