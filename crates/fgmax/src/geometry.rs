//! Resolution of partially specified grid geometry.
//!
//! For each axis either a point count or a spacing is authoritative. A given
//! count fixes the spacing at `extent / (count + 1)`; a given spacing fixes
//! the count at `round(extent / spacing) + 1` and, if the spacing does not
//! divide the extent to within [`ROUNDTRIP_TOL`], moves the upper bound so
//! that it does.

use crate::descriptor::GridDescriptor;
use crate::diagnostics::{Axis, Diagnostics, GeometryWarning};
use crate::error::{FgmaxError, Result};
use crate::types::{BoundingBox, PointStyle};

/// Largest tolerated `|(n-1)*d - extent|` before the upper bound is moved.
pub const ROUNDTRIP_TOL: f64 = 1e-6;

/// Fully resolved geometry, as written to the input file.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedGeometry {
    /// Equally spaced points between two endpoints (style 1).
    Transect {
        npts: usize,
        dx: f64,
        start: (f64, f64),
        end: (f64, f64),
    },
    /// Rectangular lattice (style 2).
    Rectangular {
        nx: usize,
        ny: usize,
        dx: f64,
        dy: f64,
        bbox: BoundingBox,
    },
    /// Lattice inside a quadrilateral (style 3).
    Quadrilateral {
        n12: usize,
        n23: usize,
        corners: [(f64, f64); 4],
    },
}

impl ResolvedGeometry {
    /// Total number of points.
    pub fn npts(&self) -> usize {
        match self {
            Self::Transect { npts, .. } => *npts,
            Self::Rectangular { nx, ny, .. } => nx * ny,
            Self::Quadrilateral { n12, n23, .. } => n12 * n23,
        }
    }

    /// Style code of this geometry.
    pub fn point_style(&self) -> PointStyle {
        match self {
            Self::Transect { .. } => PointStyle::PointList,
            Self::Rectangular { .. } => PointStyle::Rectangular,
            Self::Quadrilateral { .. } => PointStyle::Quadrilateral,
        }
    }
}

/// Count, spacing, and (possibly moved) upper bound along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisResolution {
    pub count: usize,
    pub spacing: f64,
    pub upper: f64,
}

/// Resolve one axis from `lower..upper` and whichever of count/spacing is set.
pub fn resolve_axis(
    axis: Axis,
    lower: f64,
    upper: f64,
    spacing: Option<f64>,
    count: Option<usize>,
    diagnostics: &dyn Diagnostics,
) -> Result<AxisResolution> {
    let extent = upper - lower;

    if let Some(count) = count {
        let derived = extent / (count as f64 + 1.0);
        if let Some(given) = spacing {
            diagnostics.warn(GeometryWarning::SpacingOverridden {
                axis,
                given,
                derived,
            });
        }
        return Ok(AxisResolution {
            count,
            spacing: derived,
            upper,
        });
    }

    let spacing = spacing.ok_or_else(|| {
        FgmaxError::not_configured(format!("either n{axis} or d{axis} must be set"))
    })?;
    let count = count_for_spacing(extent, spacing, axis)?;

    let mismatch = ((count - 1) as f64 * spacing + lower - upper).abs();
    let upper = if mismatch > ROUNDTRIP_TOL {
        let new = lower + spacing * (count - 1) as f64;
        diagnostics.warn(GeometryWarning::UpperBoundReset {
            axis,
            mismatch,
            old: upper,
            new,
        });
        new
    } else {
        upper
    };

    Ok(AxisResolution {
        count,
        spacing,
        upper,
    })
}

fn count_for_spacing(extent: f64, spacing: f64, axis: Axis) -> Result<usize> {
    let ratio = (extent / spacing).round();
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(FgmaxError::not_configured(format!(
            "d{axis} = {spacing} does not fit extent {extent}"
        )));
    }
    Ok(ratio as usize + 1)
}

fn required(value: Option<f64>, name: &str) -> Result<f64> {
    value.ok_or_else(|| FgmaxError::not_configured(format!("{name} must be set")))
}

/// Resolve the descriptor's geometry for writing.
///
/// Nothing on the descriptor changes; corrections show up in the returned
/// geometry and as warnings on `diagnostics`.
pub fn resolve(fg: &GridDescriptor, diagnostics: &dyn Diagnostics) -> Result<ResolvedGeometry> {
    let style = fg
        .point_style
        .ok_or_else(|| FgmaxError::not_configured("point_style is not set"))?;

    match style {
        PointStyle::PointList => resolve_transect(fg, diagnostics),
        PointStyle::Rectangular => resolve_rectangular(fg, diagnostics),
        PointStyle::Quadrilateral => resolve_quadrilateral(fg),
        PointStyle::PointCount => Err(FgmaxError::unsupported_style(style.code(), "write_input_data")),
    }
}

fn resolve_rectangular(fg: &GridDescriptor, diagnostics: &dyn Diagnostics) -> Result<ResolvedGeometry> {
    let x1 = required(fg.x1, "x1")?;
    let x2 = required(fg.x2, "x2")?;
    let y1 = required(fg.y1, "y1")?;
    let y2 = required(fg.y2, "y2")?;

    let x = resolve_axis(Axis::X, x1, x2, fg.dx, fg.nx, diagnostics)?;
    // Without ny or dy the lattice is square.
    let dy = match (fg.ny, fg.dy) {
        (None, None) => Some(x.spacing),
        (_, dy) => dy,
    };
    let y = resolve_axis(Axis::Y, y1, y2, dy, fg.ny, diagnostics)?;

    Ok(ResolvedGeometry::Rectangular {
        nx: x.count,
        ny: y.count,
        dx: x.spacing,
        dy: y.spacing,
        bbox: BoundingBox::new(x1, y1, x.upper, y.upper),
    })
}

fn resolve_transect(fg: &GridDescriptor, diagnostics: &dyn Diagnostics) -> Result<ResolvedGeometry> {
    let x1 = required(fg.x1, "x1")?;
    let x2 = required(fg.x2, "x2")?;
    let y1 = required(fg.y1, "y1")?;
    let y2 = required(fg.y2, "y2")?;
    let length = (x2 - x1).hypot(y2 - y1);

    if let Some(npts) = fg.npts {
        let dx = length / (npts as f64 + 1.0);
        if let Some(given) = fg.dx {
            diagnostics.warn(GeometryWarning::SpacingOverridden {
                axis: Axis::X,
                given,
                derived: dx,
            });
        }
        return Ok(ResolvedGeometry::Transect {
            npts,
            dx,
            start: (x1, y1),
            end: (x2, y2),
        });
    }

    let dx = fg
        .dx
        .ok_or_else(|| FgmaxError::not_configured("either npts or dx must be set"))?;
    let npts = count_for_spacing(length, dx, Axis::X)?;

    // The check runs along x only; both endpoints move together.
    let mismatch = ((npts - 1) as f64 * dx + x1 - x2).abs();
    let end = if mismatch > ROUNDTRIP_TOL {
        let new_x2 = x1 + dx * (npts - 1) as f64;
        let new_y2 = y1 + dx * (npts - 1) as f64;
        diagnostics.warn(GeometryWarning::UpperBoundReset {
            axis: Axis::X,
            mismatch,
            old: x2,
            new: new_x2,
        });
        diagnostics.warn(GeometryWarning::UpperBoundReset {
            axis: Axis::Y,
            mismatch,
            old: y2,
            new: new_y2,
        });
        (new_x2, new_y2)
    } else {
        (x2, y2)
    };

    Ok(ResolvedGeometry::Transect {
        npts,
        dx,
        start: (x1, y1),
        end,
    })
}

fn resolve_quadrilateral(fg: &GridDescriptor) -> Result<ResolvedGeometry> {
    let (n12, n23) = match (fg.n12, fg.n23) {
        (Some(n12), Some(n23)) => (n12, n23),
        _ => return Err(FgmaxError::not_configured("need to set n12 and n23")),
    };

    let corners = [
        (required(fg.x1, "x1")?, required(fg.y1, "y1")?),
        (required(fg.x2, "x2")?, required(fg.y2, "y2")?),
        (required(fg.x3, "x3")?, required(fg.y3, "y3")?),
        (required(fg.x4, "x4")?, required(fg.y4, "y4")?),
    ];

    Ok(ResolvedGeometry::Quadrilateral { n12, n23, corners })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;

    fn rectangular(x1: f64, x2: f64, y1: f64, y2: f64) -> GridDescriptor {
        GridDescriptor {
            point_style: Some(PointStyle::Rectangular),
            x1: Some(x1),
            x2: Some(x2),
            y1: Some(y1),
            y2: Some(y2),
            min_level_check: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_count_from_spacing_exact() {
        let diag = RecordingDiagnostics::new();
        let r = resolve_axis(Axis::X, 0.0, 1.0, Some(0.25), None, &diag).unwrap();
        assert_eq!(r.count, 5);
        assert_eq!(r.spacing, 0.25);
        assert_eq!(r.upper, 1.0);
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn test_count_from_spacing_resets_upper() {
        let diag = RecordingDiagnostics::new();
        let r = resolve_axis(Axis::X, 0.0, 1.05, Some(0.25), None, &diag).unwrap();
        // round(4.2) + 1
        assert_eq!(r.count, 5);
        assert_eq!(r.upper, 0.0 + 0.25 * 4.0);

        let warnings = diag.warnings();
        assert_eq!(warnings.len(), 1);
        match &warnings[0] {
            GeometryWarning::UpperBoundReset { axis, old, new, mismatch } => {
                assert_eq!(*axis, Axis::X);
                assert_eq!(*old, 1.05);
                assert_eq!(*new, 1.0);
                assert!((mismatch - 0.05).abs() < 1e-12);
            }
            other => panic!("unexpected warning: {other:?}"),
        }
    }

    #[test]
    fn test_spacing_from_count_is_half_open() {
        let diag = RecordingDiagnostics::new();
        let r = resolve_axis(Axis::Y, 2.0, 12.0, None, Some(4), &diag).unwrap();
        assert_eq!(r.count, 4);
        assert_eq!(r.spacing, 10.0 / 5.0);
        assert_ne!(r.spacing, 10.0 / 3.0);
        assert_eq!(r.upper, 12.0);
    }

    #[test]
    fn test_count_wins_over_spacing() {
        let diag = RecordingDiagnostics::new();
        let r = resolve_axis(Axis::X, 0.0, 9.0, Some(1.0), Some(2), &diag).unwrap();
        assert_eq!(r.count, 2);
        assert_eq!(r.spacing, 3.0);
        assert_eq!(
            diag.warnings(),
            vec![GeometryWarning::SpacingOverridden {
                axis: Axis::X,
                given: 1.0,
                derived: 3.0
            }]
        );
    }

    #[test]
    fn test_axis_needs_count_or_spacing() {
        let diag = RecordingDiagnostics::new();
        let err = resolve_axis(Axis::X, 0.0, 1.0, None, None, &diag).unwrap_err();
        assert!(matches!(err, FgmaxError::NotConfigured(_)));
    }

    #[test]
    fn test_rectangular_dy_defaults_to_dx() {
        let mut fg = rectangular(0.0, 2.0, 0.0, 1.0);
        fg.dx = Some(0.5);
        let geom = resolve(&fg, &RecordingDiagnostics::new()).unwrap();
        match geom {
            ResolvedGeometry::Rectangular { nx, ny, dx, dy, bbox } => {
                assert_eq!((nx, ny), (5, 3));
                assert_eq!(dx, 0.5);
                assert_eq!(dy, 0.5);
                assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 2.0, 1.0));
            }
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn test_rectangular_dy_defaults_to_derived_dx() {
        let mut fg = rectangular(0.0, 4.0, 0.0, 2.0);
        fg.nx = Some(3);
        let geom = resolve(&fg, &RecordingDiagnostics::new()).unwrap();
        match geom {
            ResolvedGeometry::Rectangular { nx, ny, dx, dy, .. } => {
                assert_eq!(nx, 3);
                assert_eq!(dx, 1.0);
                assert_eq!(dy, 1.0);
                assert_eq!(ny, 3);
            }
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn test_transect_from_spacing() {
        let fg = GridDescriptor {
            point_style: Some(PointStyle::PointList),
            x1: Some(0.0),
            y1: Some(0.0),
            x2: Some(3.0),
            y2: Some(4.0),
            dx: Some(1.0),
            ..Default::default()
        };
        let diag = RecordingDiagnostics::new();
        let geom = resolve(&fg, &diag).unwrap();
        match geom {
            ResolvedGeometry::Transect { npts, dx, start, end } => {
                // length 5
                assert_eq!(npts, 6);
                assert_eq!(dx, 1.0);
                assert_eq!(start, (0.0, 0.0));
                // x-only check: 5*1 + 0 - 3 = 2 > tol
                assert_eq!(end, (5.0, 5.0));
            }
            other => panic!("unexpected geometry: {other:?}"),
        }
        assert_eq!(diag.warnings().len(), 2);
    }

    #[test]
    fn test_transect_from_count() {
        let fg = GridDescriptor {
            point_style: Some(PointStyle::PointList),
            x1: Some(0.0),
            y1: Some(0.0),
            x2: Some(3.0),
            y2: Some(4.0),
            npts: Some(4),
            ..Default::default()
        };
        let geom = resolve(&fg, &RecordingDiagnostics::new()).unwrap();
        assert_eq!(
            geom,
            ResolvedGeometry::Transect {
                npts: 4,
                dx: 1.0,
                start: (0.0, 0.0),
                end: (3.0, 4.0)
            }
        );
    }

    #[test]
    fn test_quadrilateral_requires_counts() {
        let fg = GridDescriptor {
            point_style: Some(PointStyle::Quadrilateral),
            n12: Some(3),
            ..Default::default()
        };
        let err = resolve(&fg, &RecordingDiagnostics::new()).unwrap_err();
        assert!(matches!(err, FgmaxError::NotConfigured(_)));
    }

    #[test]
    fn test_point_count_style_not_writable() {
        let fg = GridDescriptor {
            point_style: Some(PointStyle::PointCount),
            npts: Some(3),
            ..Default::default()
        };
        let err = resolve(&fg, &RecordingDiagnostics::new()).unwrap_err();
        assert!(matches!(
            err,
            FgmaxError::UnsupportedPointStyle { style: 0, .. }
        ));
    }

    #[test]
    fn test_missing_corner_is_configuration_error() {
        let mut fg = rectangular(0.0, 1.0, 0.0, 1.0);
        fg.x2 = None;
        fg.dx = Some(0.1);
        let err = resolve(&fg, &RecordingDiagnostics::new()).unwrap_err();
        assert!(err.to_string().contains("x2"));
    }
}
