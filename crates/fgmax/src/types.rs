//! Core types shared by the input and output pipelines.

use ndarray::{IxDyn, ShapeBuilder, StrideShape};
use serde::{Deserialize, Serialize};

use crate::error::{FgmaxError, Result};

/// Values below this threshold are "no data" sentinels in simulator output.
pub const SENTINEL_THRESHOLD: f64 = -1e50;

/// Geometry family of an fgmax grid.
///
/// The numeric codes are the ones written to and read from the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PointStyle {
    /// A point count with no coordinates in the input file.
    PointCount,
    /// An explicit list of points (or a transect when writing).
    PointList,
    /// A rectangular lattice between two corners.
    Rectangular,
    /// A logically rectangular lattice inside an arbitrary quadrilateral.
    Quadrilateral,
}

impl PointStyle {
    /// Map an input-file code to a style.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::PointCount),
            1 => Some(Self::PointList),
            2 => Some(Self::Rectangular),
            3 => Some(Self::Quadrilateral),
            _ => None,
        }
    }

    /// The code written to the input file.
    pub fn code(&self) -> i64 {
        match self {
            Self::PointCount => 0,
            Self::PointList => 1,
            Self::Rectangular => 2,
            Self::Quadrilateral => 3,
        }
    }

    /// Styles 0 and 1 share the `npts` field.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::PointCount | Self::PointList)
    }
}

impl TryFrom<i64> for PointStyle {
    type Error = String;

    fn try_from(code: i64) -> std::result::Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unknown point_style {}", code))
    }
}

impl From<PointStyle> for i64 {
    fn from(style: PointStyle) -> Self {
        style.code()
    }
}

impl std::fmt::Display for PointStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Order in which flat result rows fill the grid shape.
///
/// The simulator writes rows with the first index varying fastest, so
/// `ColumnMajor` is the only order that matches real output files. A wrong
/// choice produces transposed fields without any error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// First index varies fastest (Fortran order).
    #[default]
    ColumnMajor,
    /// Last index varies fastest (C order).
    RowMajor,
}

impl RowOrder {
    /// Build an ndarray shape with this memory order.
    pub fn shape(&self, dims: &[usize]) -> StrideShape<IxDyn> {
        match self {
            Self::ColumnMajor => IxDyn(dims).f().into(),
            Self::RowMajor => IxDyn(dims).into(),
        }
    }

    /// Flat row index of a multi-dimensional grid index.
    pub fn flat_index(&self, index: &[usize], dims: &[usize]) -> usize {
        let mut flat = 0;
        match self {
            Self::ColumnMajor => {
                for (i, n) in index.iter().zip(dims).rev() {
                    flat = flat * n + i;
                }
            }
            Self::RowMajor => {
                for (i, n) in index.iter().zip(dims) {
                    flat = flat * n + i;
                }
            }
        }
        flat
    }
}

/// Shape of every decoded field for a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridShape {
    dims: Vec<usize>,
}

impl GridShape {
    /// One-dimensional shape for point lists.
    pub fn list(npts: usize) -> Self {
        Self { dims: vec![npts] }
    }

    /// Two-dimensional shape for lattices.
    pub fn lattice(n1: usize, n2: usize) -> Self {
        Self { dims: vec![n1, n2] }
    }

    /// Dimensions in index order.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Total number of grid points.
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    /// Check if the shape holds no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the shape for a style from its count attributes.
    pub fn for_style(
        style: PointStyle,
        npts: Option<usize>,
        nx_ny: (Option<usize>, Option<usize>),
        n12_n23: (Option<usize>, Option<usize>),
    ) -> Result<Self> {
        let pair = |a: Option<usize>, b: Option<usize>, names: &str| match (a, b) {
            (Some(a), Some(b)) => Ok(Self::lattice(a, b)),
            _ => Err(FgmaxError::not_configured(format!(
                "{} must be set for point_style {}",
                names, style
            ))),
        };

        match style {
            PointStyle::PointCount | PointStyle::PointList => npts.map(Self::list).ok_or_else(|| {
                FgmaxError::not_configured(format!("npts must be set for point_style {}", style))
            }),
            PointStyle::Rectangular => pair(nx_ny.0, nx_ny.1, "nx and ny"),
            PointStyle::Quadrilateral => pair(n12_n23.0, n12_n23.1, "n12 and n23"),
        }
    }
}

/// An axis-aligned box given by its lower-left and upper-right corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Get the extent in x.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Get the extent in y.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_style_codes() {
        for code in 0..4 {
            let style = PointStyle::from_code(code).unwrap();
            assert_eq!(style.code(), code);
        }
        assert_eq!(PointStyle::from_code(4), None);
        assert_eq!(PointStyle::from_code(-1), None);
        assert!(PointStyle::PointCount.is_list());
        assert!(PointStyle::PointList.is_list());
        assert!(!PointStyle::Rectangular.is_list());
    }

    #[test]
    fn test_flat_index_column_major() {
        let dims = [3, 2];
        assert_eq!(RowOrder::ColumnMajor.flat_index(&[0, 0], &dims), 0);
        assert_eq!(RowOrder::ColumnMajor.flat_index(&[1, 0], &dims), 1);
        assert_eq!(RowOrder::ColumnMajor.flat_index(&[0, 1], &dims), 3);
        assert_eq!(RowOrder::ColumnMajor.flat_index(&[2, 1], &dims), 5);
    }

    #[test]
    fn test_flat_index_row_major() {
        let dims = [3, 2];
        assert_eq!(RowOrder::RowMajor.flat_index(&[0, 1], &dims), 1);
        assert_eq!(RowOrder::RowMajor.flat_index(&[1, 0], &dims), 2);
        assert_eq!(RowOrder::RowMajor.flat_index(&[2, 1], &dims), 5);
    }

    #[test]
    fn test_shape_for_style() {
        let shape = GridShape::for_style(PointStyle::Rectangular, None, (Some(4), Some(3)), (None, None))
            .unwrap();
        assert_eq!(shape.dims(), &[4, 3]);
        assert_eq!(shape.len(), 12);

        let shape =
            GridShape::for_style(PointStyle::PointCount, Some(7), (None, None), (None, None)).unwrap();
        assert_eq!(shape.dims(), &[7]);

        let err = GridShape::for_style(PointStyle::Quadrilateral, None, (None, None), (Some(2), None));
        assert!(matches!(err, Err(FgmaxError::NotConfigured(_))));
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::new(-100.0, 30.0, -90.0, 45.0);
        assert!((bbox.width() - 10.0).abs() < f64::EPSILON);
        assert!((bbox.height() - 15.0).abs() < f64::EPSILON);
    }
}
