//! Heuristic reliability scoring for resolved span-to-region mappings.

use crate::content::PageContent;
use crate::geometry::Region;

/// Base score for any successful resolution.
const BASE_CONFIDENCE: f64 = 0.8;
/// Bonus when more than one region corroborates the match.
const MULTI_REGION_BONUS: f64 = 0.1;
/// Bonus when the mean region area is a plausible glyph-cluster size.
const PLAUSIBLE_AREA_BONUS: f64 = 0.05;
/// Plausible glyph-cluster area band, exclusive on both ends. Rejects
/// degenerate near-zero boxes and implausible whole-page boxes.
const MIN_PLAUSIBLE_AREA: f64 = 10.0;
const MAX_PLAUSIBLE_AREA: f64 = 100_000.0;

/// Score the reliability of a resolved mapping.
///
/// Returns 0.0 exactly when `regions` is empty; otherwise starts from
/// 0.8, adds 0.1 for independent corroboration across occurrences, adds
/// 0.05 when the mean region area falls strictly within the plausible
/// band, and clamps to 1.0. Always in `[0, 1]`.
pub fn score(_span_text: &str, regions: &[Region], _page: &PageContent) -> f64 {
    if regions.is_empty() {
        return 0.0;
    }

    let mut confidence = BASE_CONFIDENCE;
    if regions.len() > 1 {
        confidence += MULTI_REGION_BONUS;
    }

    let mean_area = regions.iter().map(Region::area).sum::<f64>() / regions.len() as f64;
    if mean_area > MIN_PLAUSIBLE_AREA && mean_area < MAX_PLAUSIBLE_AREA {
        confidence += PLAUSIBLE_AREA_BONUS;
    }

    confidence.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageContent {
        PageContent::empty(0, 612.0, 792.0)
    }

    #[test]
    fn empty_regions_score_zero() {
        assert_eq!(score("Jane Doe", &[], &page()), 0.0);
    }

    #[test]
    fn single_plausible_region_scores_085() {
        // 80 x 12 = 960 square units, inside the band.
        let regions = [Region::new(72.0, 63.0, 152.0, 75.0)];
        assert!((score("555-12-3456", &regions, &page()) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn two_regions_score_095() {
        let regions = [
            Region::new(72.0, 63.0, 152.0, 75.0),
            Region::new(72.0, 83.0, 152.0, 95.0),
        ];
        assert!((score("x", &regions, &page()) - 0.95).abs() < 1e-9);
    }

    #[test]
    fn degenerate_area_gets_no_bonus() {
        // 2 x 2 = 4 square units, below the band.
        let regions = [Region::new(0.0, 0.0, 2.0, 2.0)];
        assert!((score("x", &regions, &page()) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn whole_page_area_gets_no_bonus() {
        // 612 x 792 ≈ 484k square units, above the band.
        let regions = [Region::new(0.0, 0.0, 612.0, 792.0)];
        assert!((score("x", &regions, &page()) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn band_bounds_are_exclusive() {
        // Mean area exactly 10 → no bonus.
        let regions = [Region::new(0.0, 0.0, 5.0, 2.0)];
        assert!((score("x", &regions, &page()) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn score_always_in_unit_interval() {
        let many: Vec<Region> = (0..10)
            .map(|i| Region::new(0.0, 20.0 * i as f64, 80.0, 20.0 * i as f64 + 12.0))
            .collect();
        let s = score("x", &many, &page());
        assert!((0.0..=1.0).contains(&s));
    }
}
