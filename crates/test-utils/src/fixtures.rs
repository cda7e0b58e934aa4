//! Common test fixtures for fgmax tests.
//!
//! Geometries here are plain tuples so the fixtures stay independent of the
//! crates under test.

/// Bounding boxes as `(x1, y1, x2, y2)`.
pub mod bbox {
    /// A small coastal strip whose extents are exact multiples of [`super::spacing::COARSE`].
    pub const COASTAL: (f64, f64, f64, f64) = (-120.0, 34.0, -119.0, 34.5);

    /// Upper bounds that do not land on a `0.3` lattice.
    pub const UNEVEN: (f64, f64, f64, f64) = (0.0, 0.0, 1.0, 1.0);

    /// Degenerate box with zero extent.
    pub const POINT: (f64, f64, f64, f64) = (0.0, 0.0, 0.0, 0.0);
}

/// Grid spacings.
pub mod spacing {
    /// 0.1 degrees.
    pub const COARSE: f64 = 0.1;

    /// Spacing that does not divide [`super::bbox::UNEVEN`].
    pub const ODD: f64 = 0.3;
}

/// Quadrilateral corners in counter-clockwise order.
pub mod quad {
    /// A rotated rectangle.
    pub const ROTATED: [(f64, f64); 4] = [(0.0, 0.0), (2.0, 1.0), (1.5, 2.0), (-0.5, 1.0)];

    /// Points along the 1-2 and 2-3 edges.
    pub const N12: usize = 5;
    pub const N23: usize = 4;
}

/// Transect endpoints as `(x1, y1, x2, y2)`.
pub mod transect {
    /// A diagonal transect whose x extent is a multiple of `0.25`.
    pub const DIAGONAL: (f64, f64, f64, f64) = (0.0, 0.0, 1.0, 2.0);

    /// Point spacing along x.
    pub const DX: f64 = 0.25;
}

/// Monitoring parameters.
pub mod monitoring {
    pub const MIN_LEVEL_CHECK: i64 = 2;
    pub const TSTART_MAX: f64 = 10.0;
    pub const TEND_MAX: f64 = 3600.0;
    pub const DT_CHECK: f64 = 5.0;
    pub const ARRIVAL_TOL: f64 = 0.05;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_ordering() {
        for (x1, y1, x2, y2) in [bbox::COASTAL, bbox::UNEVEN] {
            assert!(x1 < x2);
            assert!(y1 < y2);
        }
    }

    #[test]
    fn test_coastal_extent_divides_spacing() {
        let (x1, _, x2, _) = bbox::COASTAL;
        let steps = (x2 - x1) / spacing::COARSE;
        assert!((steps - steps.round()).abs() < 1e-9);
    }

    #[test]
    fn test_uneven_extent_does_not_divide_spacing() {
        let (x1, _, x2, _) = bbox::UNEVEN;
        let steps = (x2 - x1) / spacing::ODD;
        assert!((steps - steps.round()).abs() > 1e-3);
    }
}
