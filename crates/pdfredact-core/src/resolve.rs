//! Tiered span-to-region resolution.
//!
//! Maps an arbitrary literal text span to the on-page rectangles that
//! render it. Three strategies are tried as an explicit ordered list,
//! each only when the previous yielded nothing; the first non-empty
//! result wins:
//!
//! 1. **Direct** — literal match of the normalized needle against the
//!    page glyph stream, with a case-folded retry in case-insensitive
//!    mode.
//! 2. **Context** — occurrence positions of the needle inside the
//!    normalized page text, each mapped back to the glyphs that produced
//!    it. Recovers matches the direct tier misses due to normalization
//!    mismatches (wrapped lines, irregular whitespace, ligatures).
//! 3. **Fuzzy** — containment test against layout leaf spans; each
//!    containing span contributes its own bounding box. Fallback for
//!    style-fragmented text the page engine never placed contiguously.
//!
//! A span with no match in any tier resolves to an empty set — that is
//! a recall loss, never an error.

use crate::content::PageContent;
use crate::geometry::Region;
use crate::normalize::{NormalizeOptions, UnicodeNorm, normalize};
use crate::search::{NormalizedText, regions_by_line, search_glyphs};

/// Options controlling resolution behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolveOptions {
    /// Case-sensitive matching (default: `false`).
    pub case_sensitive: bool,
    /// Collapse whitespace before comparison (default: `true`).
    pub collapse_whitespace: bool,
    /// Unicode normalization form (default: NFKC).
    pub unicode: UnicodeNorm,
    /// Characters of surrounding context per side available to the
    /// context tier; 0 disables normalized-text recovery (default: 20).
    pub context_window: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            collapse_whitespace: true,
            unicode: UnicodeNorm::default(),
            context_window: 20,
        }
    }
}

impl ResolveOptions {
    fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            case_sensitive: self.case_sensitive,
            collapse_whitespace: self.collapse_whitespace,
            unicode: self.unicode,
        }
    }
}

/// The ordered fallback tiers. Kept explicit rather than buried in
/// nested conditionals so the short-circuit order is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Direct,
    Context,
    Fuzzy,
}

const TIERS: [Tier; 3] = [Tier::Direct, Tier::Context, Tier::Fuzzy];

/// Maps literal text spans to on-page regions. Stateless between calls;
/// `resolve` is idempotent for a given page and span.
#[derive(Debug, Clone, Default)]
pub struct RegionResolver {
    options: ResolveOptions,
}

impl RegionResolver {
    pub fn new(options: ResolveOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Resolve `span_text` to the regions that render it on `page`.
    ///
    /// Empty or whitespace-only input returns empty immediately with no
    /// search attempted. Overlapping or adjacent boxes are returned as
    /// found; no merging is performed here.
    pub fn resolve(&self, page: &PageContent, span_text: &str) -> Vec<Region> {
        let needle = normalize(span_text, &self.options.normalize_options());
        if needle.is_empty() {
            return Vec::new();
        }

        for tier in TIERS {
            let regions = match tier {
                Tier::Direct => self.direct_search(page, &needle),
                Tier::Context => self.context_search(page, &needle),
                Tier::Fuzzy => self.fuzzy_search(page, &needle),
            };
            if !regions.is_empty() {
                return finalize(regions, page);
            }
        }
        Vec::new()
    }

    /// Tier 1: exact literal match against the glyph stream; in
    /// case-insensitive mode a failed exact match is retried with a
    /// case-folded needle.
    fn direct_search(&self, page: &PageContent, needle: &str) -> Vec<Region> {
        let exact = search_glyphs(&page.glyphs, needle, true);
        if !exact.is_empty() || self.options.case_sensitive {
            return exact;
        }
        search_glyphs(&page.glyphs, &needle.to_lowercase(), false)
    }

    /// Tier 2: every occurrence of the needle inside the normalized page
    /// text contributes the needle's own glyph rectangles, recovered
    /// through the normalized-to-glyph index. Each occurrence position
    /// maps straight back to the glyphs that produced it, so no
    /// re-confirmation pass is needed. The union over occurrences is
    /// returned; dedup is left to the caller.
    fn context_search(&self, page: &PageContent, needle: &str) -> Vec<Region> {
        if self.options.context_window == 0 {
            return Vec::new();
        }
        let norm = NormalizedText::build(&page.glyphs, &self.options.normalize_options());
        let mut all = Vec::new();
        for (start, end) in norm.find_all(needle) {
            let indices = norm.glyph_indices(start, end);
            all.extend(regions_by_line(&page.glyphs, &indices));
        }
        all
    }

    /// Tier 3: normalized containment against layout leaf spans. Catches
    /// line-wrapped or style-fragmented text where the literal substring
    /// never occurs contiguously.
    fn fuzzy_search(&self, page: &PageContent, needle: &str) -> Vec<Region> {
        let opts = self.options.normalize_options();
        page.layout
            .leaf_spans()
            .filter(|span| normalize(&span.text, &opts).contains(needle))
            .map(|span| span.bbox)
            .collect()
    }
}

/// Clamp to page bounds and drop anything degenerate.
fn finalize(regions: Vec<Region>, page: &PageContent) -> Vec<Region> {
    regions
        .into_iter()
        .map(|r| r.clamp_to(page.width, page.height))
        .filter(Region::is_valid)
        .collect()
}
