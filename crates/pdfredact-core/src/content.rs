//! Extracted page content model.
//!
//! A page is represented three ways at once, all derived from the same
//! interpretation pass and kept consistent by construction:
//!
//! - a flat, reading-ordered glyph stream ([`Glyph`]) whose concatenated
//!   text equals the page's raw text exactly,
//! - the raw text string itself,
//! - a hierarchical layout (blocks → lines → spans) with bounding boxes.
//!
//! Synthetic separator glyphs (single space within a line, newline
//! between lines) carry zero-area bounding boxes so byte offsets into
//! the raw text always map back to glyph positions, while degenerate
//! boxes never leak into resolved regions.

use crate::geometry::Region;

/// One positioned character from a page, or a synthetic separator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    /// Decoded text for this glyph (usually a single char).
    pub text: String,
    /// Bounding box in top-left origin page coordinates.
    /// Zero-area for synthetic separators.
    pub bbox: Region,
    /// `true` for separator glyphs inserted during text assembly;
    /// they exist only so raw-text offsets map onto the glyph stream.
    pub synthetic: bool,
}

impl Glyph {
    pub fn new(text: impl Into<String>, bbox: Region) -> Self {
        Self {
            text: text.into(),
            bbox,
            synthetic: false,
        }
    }

    /// A separator glyph with a degenerate box anchored at `x`, `y`.
    pub fn separator(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            bbox: Region::new(x, y, x, y),
            synthetic: true,
        }
    }
}

/// A leaf text span: one uninterrupted run of glyphs with a shared box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextSpan {
    pub text: String,
    pub bbox: Region,
}

/// A rendered line of text spans.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutLine {
    pub spans: Vec<TextSpan>,
    pub bbox: Region,
}

/// A block of vertically adjacent lines.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutBlock {
    pub lines: Vec<LayoutLine>,
    pub bbox: Region,
}

/// Hierarchical page layout: blocks → lines → spans.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageLayout {
    pub blocks: Vec<LayoutBlock>,
}

impl PageLayout {
    /// Iterate over all leaf text spans in reading order.
    pub fn leaf_spans(&self) -> impl Iterator<Item = &TextSpan> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.spans.iter())
    }
}

/// Everything the resolver needs to know about one page.
/// Owned by the document for its lifetime; read-only to consumers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageContent {
    /// 0-based page index.
    pub index: usize,
    /// Page width in page units.
    pub width: f64,
    /// Page height in page units.
    pub height: f64,
    /// Raw extracted text; equals the concatenation of `glyphs` texts.
    pub raw_text: String,
    /// Reading-ordered glyph stream, separators included.
    pub glyphs: Vec<Glyph>,
    /// Hierarchical layout.
    pub layout: PageLayout,
}

impl PageContent {
    /// An empty page of the given dimensions.
    pub fn empty(index: usize, width: f64, height: f64) -> Self {
        Self {
            index,
            width,
            height,
            raw_text: String::new(),
            glyphs: Vec::new(),
            layout: PageLayout::default(),
        }
    }
}
