//! PII span and redaction plan data model.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::geometry::Region;

/// A caller-supplied literal text fragment believed to contain PII,
/// tied to a page. Produced by an external detector, consumed once.
///
/// `char_start`/`char_end` are advisory: resolution is purely by content
/// match, so every on-page occurrence of the literal is redacted (the
/// fail-safe direction — over-redaction rather than a missed duplicate).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PiiSpan {
    /// 0-based page index this span was detected on.
    pub page_index: usize,
    /// The literal text to remove.
    pub text: String,
    /// Advisory character offset of the span within the page text.
    pub char_start: usize,
    /// Advisory end offset (exclusive).
    pub char_end: usize,
}

impl PiiSpan {
    pub fn new(page_index: usize, text: impl Into<String>, char_start: usize, char_end: usize) -> Self {
        Self {
            page_index,
            text: text.into(),
            char_start,
            char_end,
        }
    }
}

/// A PII span together with its resolved on-page regions and a
/// heuristic reliability score. Confidence is 0.0 exactly when no
/// region was resolved.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MappedPii {
    pub span: PiiSpan,
    pub regions: Vec<Region>,
    pub confidence: f64,
}

/// RGB fill color for redaction boxes, components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl FillColor {
    pub const BLACK: FillColor = FillColor {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }
}

impl Default for FillColor {
    fn default() -> Self {
        Self::BLACK
    }
}

/// One accepted redaction on a page: the literal text and the regions
/// that render it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedRedaction {
    pub text: String,
    pub regions: Vec<Region>,
}

/// All accepted redactions for a job, grouped by page so the applier
/// can perform one atomic removal pass per page. Built once per job.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RedactionPlan {
    by_page: BTreeMap<usize, Vec<PlannedRedaction>>,
}

impl RedactionPlan {
    /// Append an accepted redaction under its page, preserving order.
    pub fn push(&mut self, page_index: usize, redaction: PlannedRedaction) {
        self.by_page.entry(page_index).or_default().push(redaction);
    }

    /// Page indices with at least one planned redaction, ascending.
    pub fn pages(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_page.keys().copied()
    }

    /// Planned redactions for one page.
    pub fn for_page(&self, page_index: usize) -> &[PlannedRedaction] {
        self.by_page
            .get(&page_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.by_page.is_empty()
    }

    /// Total number of regions across all pages.
    pub fn region_count(&self) -> usize {
        self.by_page
            .values()
            .flat_map(|v| v.iter())
            .map(|r| r.regions.len())
            .sum()
    }
}

/// Outcome of a redaction job. Produced exactly once, immutable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RedactionResult {
    /// Total regions destructively removed.
    pub redaction_count: usize,
    /// Number of distinct pages touched.
    pub pages_redacted: usize,
    /// Final location of the output artifact.
    pub output_path: PathBuf,
}
