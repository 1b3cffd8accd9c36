/// Axis-aligned rectangle with top-left origin coordinate system.
///
/// Coordinates follow the display convention used throughout the crate:
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl Region {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the region.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the region.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Area in square page units.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// A region is valid when it has strictly positive area.
    /// Degenerate (zero-area) regions are excluded from resolver output.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Compute the union of two regions.
    pub fn union(&self, other: &Region) -> Region {
        Region {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Whether two regions overlap with strictly positive area.
    /// Edge-adjacent regions do not intersect.
    pub fn intersects(&self, other: &Region) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.top < other.bottom && other.top < self.bottom
    }

    /// Clamp the region to page bounds `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: f64, height: f64) -> Region {
        Region {
            x0: self.x0.max(0.0).min(width),
            top: self.top.max(0.0).min(height),
            x1: self.x1.max(0.0).min(width),
            bottom: self.bottom.max(0.0).min(height),
        }
    }

    /// Whether the vertical extents of two regions overlap, i.e. they sit
    /// on the same rendered line.
    pub fn same_line(&self, other: &Region) -> bool {
        self.top < other.bottom && other.top < self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_dimensions() {
        let r = Region::new(10.0, 20.0, 50.0, 60.0);
        assert_eq!(r.width(), 40.0);
        assert_eq!(r.height(), 40.0);
        assert_eq!(r.area(), 1600.0);
    }

    #[test]
    fn zero_area_region_is_invalid() {
        assert!(!Region::new(10.0, 20.0, 10.0, 60.0).is_valid());
        assert!(!Region::new(10.0, 20.0, 50.0, 20.0).is_valid());
        assert!(Region::new(10.0, 20.0, 50.0, 60.0).is_valid());
    }

    #[test]
    fn union_covers_both() {
        let a = Region::new(10.0, 20.0, 30.0, 40.0);
        let b = Region::new(5.0, 25.0, 35.0, 45.0);
        let u = a.union(&b);
        assert_eq!(u, Region::new(5.0, 20.0, 35.0, 45.0));
    }

    #[test]
    fn edge_adjacent_regions_do_not_intersect() {
        let a = Region::new(0.0, 0.0, 10.0, 10.0);
        let b = Region::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&b));
        let c = Region::new(9.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn clamp_to_page_bounds() {
        let r = Region::new(-5.0, -1.0, 700.0, 800.0);
        let c = r.clamp_to(612.0, 792.0);
        assert_eq!(c, Region::new(0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn same_line_requires_vertical_overlap() {
        let a = Region::new(0.0, 100.0, 50.0, 112.0);
        let b = Region::new(60.0, 100.0, 90.0, 112.0);
        let below = Region::new(0.0, 120.0, 50.0, 132.0);
        assert!(a.same_line(&b));
        assert!(!a.same_line(&below));
    }
}
