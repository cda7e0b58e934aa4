//! Fixed-grid maximum (fgmax) monitoring for shallow-water flood simulations.
//!
//! An fgmax grid is a fixed set of points at which the simulator tracks
//! running maxima of depth, speed and momentum, plus the wave arrival time,
//! independently of its adaptive mesh. This crate handles both ends of a run:
//!
//! - **Input**: resolve grid geometry and write the simulator's input file
//!   (plus a KML outline), or read such a file back.
//! - **Output**: decode `fort.FG<n>.valuemax` and `fort.FG<n>.aux1` into
//!   grid-shaped, masked fields.
//!
//! # Architecture
//!
//! ```text
//! GridDescriptor ──write_input_data──► geometry::resolve ──► fgmax.txt
//!      │                                     │                  + .kml
//!      │                                     └─► Diagnostics (warnings)
//!      │
//!      └──read_output──► NumericTable (valuemax, aux1)
//!                              │
//!                              ▼
//!                        output::decode ──► FgmaxResults (MaskedArray fields)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use fgmax::{GridDescriptor, PointStyle};
//!
//! let mut fg = GridDescriptor::new();
//! fg.point_style = Some(PointStyle::Rectangular);
//! fg.x1 = Some(-120.0);
//! fg.x2 = Some(-119.0);
//! fg.y1 = Some(34.0);
//! fg.y2 = Some(34.5);
//! fg.dx = Some(0.01);
//! fg.min_level_check = Some(3);
//! fg.write_input_data(None)?;
//!
//! // ... run the simulator ...
//!
//! let mut results = GridDescriptor::new();
//! results.read_input_data(Some("fgmax.txt".as_ref()))?;
//! results.read_output(Some(1), Some("_output".as_ref()))?;
//! let h = &results.results.as_ref().unwrap().h;
//! ```

pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod geometry;
pub mod input;
pub mod masked;
pub mod output;
pub mod overlay;
pub mod table;
pub mod types;

// Re-export commonly used types at crate root
pub use descriptor::GridDescriptor;
pub use diagnostics::{Axis, Diagnostics, GeometryWarning, RecordingDiagnostics, TracingDiagnostics};
pub use error::{FgmaxError, Result};
pub use geometry::{resolve, ResolvedGeometry};
pub use masked::MaskedArray;
pub use output::{decode, FgmaxResults, Quantity, ValueMaxLayout};
pub use overlay::{KmlExporter, Overlay, OverlayExporter};
pub use table::NumericTable;
pub use types::{BoundingBox, GridShape, PointStyle, RowOrder, SENTINEL_THRESHOLD};
