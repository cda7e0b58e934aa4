//! Diagnostics channel for geometry adjustments made while writing input.
//!
//! Writers never print. Adjustments are reported as [`GeometryWarning`]
//! values to a [`Diagnostics`] sink; the default sink logs them through
//! `tracing`, and [`RecordingDiagnostics`] keeps them for inspection.

use std::fmt;
use std::sync::Mutex;

/// Coordinate axis a warning refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
        }
    }
}

/// A silent correction applied while resolving grid geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryWarning {
    /// A count was given alongside a spacing; the spacing derived from the
    /// count replaces the given one.
    SpacingOverridden {
        axis: Axis,
        given: f64,
        derived: f64,
    },
    /// The spacing does not divide the extent; the upper bound was moved.
    UpperBoundReset {
        axis: Axis,
        mismatch: f64,
        old: f64,
        new: f64,
    },
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpacingOverridden { axis, derived, .. } => {
                write!(f, "d{} specified over-ridden by: {}", axis, derived)
            }
            Self::UpperBoundReset {
                axis,
                mismatch,
                old,
                new,
            } => write!(
                f,
                "abs((n{axis}-1)*d{axis} + {axis}1 - {axis}2) = {mismatch}, resetting {axis}2 from {old:22.16e} to {new:22.16e}",
            ),
        }
    }
}

/// Sink for geometry warnings.
pub trait Diagnostics {
    /// Report a geometry adjustment.
    fn warn(&self, warning: GeometryWarning);
}

/// Forwards warnings to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, warning: GeometryWarning) {
        match &warning {
            GeometryWarning::SpacingOverridden {
                axis,
                given,
                derived,
            } => tracing::warn!(%axis, given, derived, "spacing over-ridden by count"),
            GeometryWarning::UpperBoundReset {
                axis,
                mismatch,
                old,
                new,
            } => tracing::warn!(%axis, mismatch, old, new, "resetting upper bound"),
        }
    }
}

/// Stores every warning it receives.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    warnings: Mutex<Vec<GeometryWarning>>,
}

impl RecordingDiagnostics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings received so far, in order.
    pub fn warnings(&self) -> Vec<GeometryWarning> {
        self.warnings
            .lock()
            .map(|w| w.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn warn(&self, warning: GeometryWarning) {
        match self.warnings.lock() {
            Ok(mut w) => w.push(warning),
            Err(poisoned) => poisoned.into_inner().push(warning),
        }
    }
}
