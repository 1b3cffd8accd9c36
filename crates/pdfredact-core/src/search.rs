//! Literal text search over a page's glyph stream.
//!
//! The algorithm mirrors the usual char-search approach for positioned
//! text: concatenate glyph texts into a single haystack while tracking a
//! byte-offset → glyph-index mapping, find literal occurrences, then map
//! each occurrence back to the contributing glyphs' bounding boxes. A
//! match that wraps across rendered lines yields one region per line
//! rather than a page-spanning union.

use crate::content::Glyph;
use crate::geometry::Region;
use crate::normalize::NormalizeOptions;

/// Search the glyph stream for literal occurrences of `needle`.
///
/// Returns one region per occurrence per rendered line, in reading
/// order. Synthetic separator glyphs participate in matching (so a
/// needle containing a space can match across runs) but never
/// contribute their degenerate boxes to the result.
pub fn search_glyphs(glyphs: &[Glyph], needle: &str, case_sensitive: bool) -> Vec<Region> {
    if glyphs.is_empty() || needle.is_empty() {
        return Vec::new();
    }

    let mut haystack = String::new();
    let mut byte_to_glyph: Vec<usize> = Vec::new();
    for (i, g) in glyphs.iter().enumerate() {
        let piece = if case_sensitive {
            g.text.clone()
        } else {
            g.text.to_lowercase()
        };
        let start = haystack.len();
        haystack.push_str(&piece);
        for _ in start..haystack.len() {
            byte_to_glyph.push(i);
        }
    }

    let needle = if case_sensitive {
        needle.to_string()
    } else {
        needle.to_lowercase()
    };

    let mut regions = Vec::new();
    let mut from = 0;
    while let Some(rel) = haystack[from..].find(&needle) {
        let pos = from + rel;
        let end = pos + needle.len();
        let indices = glyph_indices_for_range(&byte_to_glyph, pos, end);
        regions.extend(regions_by_line(glyphs, &indices));
        from = end;
    }
    regions
}

/// Deduplicated glyph indices covered by a byte range of the haystack.
pub(crate) fn glyph_indices_for_range(
    byte_to_glyph: &[usize],
    start: usize,
    end: usize,
) -> Vec<usize> {
    let mut indices = Vec::new();
    for offset in start..end.min(byte_to_glyph.len()) {
        let idx = byte_to_glyph[offset];
        if indices.last() != Some(&idx) {
            indices.push(idx);
        }
    }
    indices
}

/// Union the boxes of the given glyphs, splitting into one region per
/// rendered line. Separator and zero-area glyphs are skipped; the result
/// contains only valid regions.
pub fn regions_by_line(glyphs: &[Glyph], indices: &[usize]) -> Vec<Region> {
    let mut regions: Vec<Region> = Vec::new();
    let mut current: Option<Region> = None;

    for &idx in indices {
        let g = &glyphs[idx];
        if g.synthetic || !g.bbox.is_valid() {
            continue;
        }
        match current {
            Some(ref mut r) if r.same_line(&g.bbox) => *r = r.union(&g.bbox),
            Some(r) => {
                regions.push(r);
                current = Some(g.bbox);
            }
            None => current = Some(g.bbox),
        }
    }
    if let Some(r) = current {
        regions.push(r);
    }
    regions.retain(Region::is_valid);
    regions
}

/// The full page text normalized for comparison, with every byte mapped
/// back to the glyph it came from.
///
/// Built once per resolution and queried for occurrence positions; this
/// is what lets the context tier anchor a normalized match to concrete
/// on-page rectangles even when the literal byte sequence never occurs
/// contiguously in the content stream.
#[derive(Debug)]
pub struct NormalizedText {
    text: String,
    byte_to_glyph: Vec<usize>,
}

impl NormalizedText {
    /// Normalize the glyph stream per `options`, tracking provenance.
    ///
    /// Whitespace runs (including separators) collapse to a single space
    /// mapped to the first whitespace glyph of the run; the text is not
    /// end-trimmed so byte offsets stay stable.
    pub fn build(glyphs: &[Glyph], options: &NormalizeOptions) -> Self {
        let mut text = String::new();
        let mut byte_to_glyph = Vec::new();

        for (i, g) in glyphs.iter().enumerate() {
            let mut piece = options.unicode.apply(&g.text);
            if !options.case_sensitive {
                piece = piece.to_lowercase();
            }
            if options.collapse_whitespace && piece.chars().all(char::is_whitespace) {
                // Collapse a whitespace run to one mapped space.
                if text.is_empty() || text.ends_with(' ') {
                    continue;
                }
                piece = " ".to_string();
            }
            let start = text.len();
            text.push_str(&piece);
            for _ in start..text.len() {
                byte_to_glyph.push(i);
            }
        }

        Self {
            text,
            byte_to_glyph,
        }
    }

    /// The normalized page text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte ranges of every non-overlapping occurrence of `needle`.
    pub fn find_all(&self, needle: &str) -> Vec<(usize, usize)> {
        if needle.is_empty() {
            return Vec::new();
        }
        let mut ranges = Vec::new();
        let mut from = 0;
        while let Some(rel) = self.text[from..].find(needle) {
            let pos = from + rel;
            ranges.push((pos, pos + needle.len()));
            from = pos + needle.len();
        }
        ranges
    }

    /// Glyph indices covered by a byte range of the normalized text.
    pub fn glyph_indices(&self, start: usize, end: usize) -> Vec<usize> {
        glyph_indices_for_range(&self.byte_to_glyph, start, end)
    }
}
