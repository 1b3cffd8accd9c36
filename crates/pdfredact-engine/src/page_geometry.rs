//! Page coordinate normalization.
//!
//! PDF content streams position text in a bottom-left origin space
//! anchored at the MediaBox origin; the rest of the pipeline works in
//! top-left origin display coordinates. [`PageGeometry`] converts
//! between the two.

use pdfredact_core::Region;

/// MediaBox-derived page geometry and the y-flip transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    x0: f64,
    y0: f64,
    width: f64,
    height: f64,
}

impl PageGeometry {
    /// Build from a MediaBox array `[x0, y0, x1, y1]` in PDF coordinates.
    pub fn new(media_box: [f64; 4]) -> Self {
        let [x0, y0, x1, y1] = media_box;
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Convert a PDF-space point to display space (top-left origin).
    pub fn to_display(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.x0, self.height - (y - self.y0))
    }

    /// Build a display-space region from PDF-space extents. The inputs
    /// need not be ordered; the result always has `x0 <= x1` and
    /// `top <= bottom`.
    pub fn display_region(&self, px0: f64, py0: f64, px1: f64, py1: f64) -> Region {
        let (ax, ay) = self.to_display(px0, py0);
        let (bx, by) = self.to_display(px1, py1);
        Region::new(ax.min(bx), ay.min(by), ax.max(bx), ay.max(by))
    }

    /// Convert a display-space region back to a PDF-space rectangle
    /// `(x, y, w, h)` for the `re` operator.
    pub fn pdf_rect(&self, region: &Region) -> (f64, f64, f64, f64) {
        let x = region.x0 + self.x0;
        let y = self.height - region.bottom + self.y0;
        (x, y, region.width(), region.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_page_y_flip() {
        let geo = PageGeometry::new([0.0, 0.0, 612.0, 792.0]);
        assert_eq!(geo.width(), 612.0);
        assert_eq!(geo.height(), 792.0);
        // Point near the top in PDF space is near the top of display space.
        let (x, y) = geo.to_display(72.0, 720.0);
        assert_eq!(x, 72.0);
        assert_eq!(y, 72.0);
    }

    #[test]
    fn offset_media_box_is_normalized() {
        let geo = PageGeometry::new([10.0, 20.0, 622.0, 812.0]);
        assert_eq!(geo.width(), 612.0);
        assert_eq!(geo.height(), 792.0);
        let (x, y) = geo.to_display(10.0, 20.0);
        assert_eq!(x, 0.0);
        assert_eq!(y, 792.0);
    }

    #[test]
    fn display_region_orders_extents() {
        let geo = PageGeometry::new([0.0, 0.0, 612.0, 792.0]);
        // Baseline region: ascent above the baseline, descent below.
        let r = geo.display_region(72.0, 717.0, 144.0, 729.0);
        assert_eq!(r, Region::new(72.0, 63.0, 144.0, 75.0));
    }

    #[test]
    fn pdf_rect_round_trips() {
        let geo = PageGeometry::new([0.0, 0.0, 612.0, 792.0]);
        let region = Region::new(72.0, 63.0, 144.0, 75.0);
        let (x, y, w, h) = geo.pdf_rect(&region);
        assert_eq!((x, y, w, h), (72.0, 717.0, 72.0, 12.0));
    }
}
