//! Redaction planning: resolve, score, filter, group by page.

use crate::confidence;
use crate::content::PageContent;
use crate::pii::{PiiSpan, PlannedRedaction, RedactionPlan};
use crate::resolve::RegionResolver;

/// Default acceptance threshold. False redaction is worse than recall
/// loss, so anything below this is dropped silently.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

/// Build a [`RedactionPlan`] for a document.
///
/// For each input span: resolve regions on its page, score the mapping,
/// and accept it when the score reaches `min_confidence`. Spans that
/// fail to resolve, score too low, or name a page index beyond
/// `pages.len()` are dropped without error. Accepted spans are grouped
/// by page, preserving input order within each page, so the applier can
/// perform one atomic removal pass per page.
pub fn build_plan(
    spans: &[PiiSpan],
    pages: &[PageContent],
    resolver: &RegionResolver,
    min_confidence: f64,
) -> RedactionPlan {
    let mut plan = RedactionPlan::default();

    for span in spans {
        let Some(page) = pages.get(span.page_index) else {
            continue;
        };
        let regions = resolver.resolve(page, &span.text);
        if regions.is_empty() {
            continue;
        }
        let score = confidence::score(&span.text, &regions, page);
        if score < min_confidence {
            continue;
        }
        plan.push(
            span.page_index,
            PlannedRedaction {
                text: span.text.clone(),
                regions,
            },
        );
    }

    plan
}
