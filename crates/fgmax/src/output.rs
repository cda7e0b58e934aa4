//! Decoding of simulator fgmax output.
//!
//! A run leaves two tables per grid in its output directory:
//!
//! - `fort.FG<n>.valuemax`: `x y level` followed by the running maxima and
//!   their times, ending with the arrival time. Three layouts exist, told
//!   apart by column count (6, 8 or 14).
//! - `fort.FG<n>.aux1`: `x y` followed by the topography seen at each AMR
//!   level `1..N`.
//!
//! Rows are in the grid's flat order. Decoding reshapes every column to the
//! grid shape, rebuilds the topography `B` from the level each maximum was
//! recorded on, and masks points the solver never updated.

use std::path::{Path, PathBuf};

use ndarray::ArrayD;

use crate::descriptor::GridDescriptor;
use crate::error::{FgmaxError, Result};
use crate::masked::MaskedArray;
use crate::table::NumericTable;
use crate::types::{GridShape, RowOrder, SENTINEL_THRESHOLD};

/// A monitored quantity with a running maximum and its time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Flow depth.
    Depth,
    /// Flow speed.
    Speed,
    /// Momentum (depth times speed).
    Momentum,
    /// Momentum flux (depth times speed squared).
    MomentumFlux,
    /// Minimum depth.
    MinDepth,
}

/// Column layout of a valuemax file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueMaxLayout {
    /// `x y level h h_time arrival_time`
    Depth,
    /// `x y level h s h_time s_time arrival_time`
    DepthSpeed,
    /// `x y level h s hs hss hmin h_time s_time hs_time hss_time hmin_time arrival_time`
    Full,
}

impl ValueMaxLayout {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const LEVEL: usize = 2;

    /// Layout for a column count.
    pub fn from_ncols(ncols: usize) -> Option<Self> {
        match ncols {
            6 => Some(Self::Depth),
            8 => Some(Self::DepthSpeed),
            14 => Some(Self::Full),
            _ => None,
        }
    }

    /// Number of columns in this layout.
    pub fn ncols(&self) -> usize {
        match self {
            Self::Depth => 6,
            Self::DepthSpeed => 8,
            Self::Full => 14,
        }
    }

    /// Value and time columns of a quantity, if the layout records it.
    pub fn columns(&self, quantity: Quantity) -> Option<(usize, usize)> {
        use Quantity::*;
        match (self, quantity) {
            (_, Depth) => Some(self.depth_columns()),
            (Self::DepthSpeed, Speed) => Some((4, 6)),
            (Self::Full, Speed) => Some((4, 9)),
            (Self::Full, Momentum) => Some((5, 10)),
            (Self::Full, MomentumFlux) => Some((6, 11)),
            (Self::Full, MinDepth) => Some((7, 12)),
            _ => None,
        }
    }

    /// Depth value and time columns; every layout records depth.
    pub fn depth_columns(&self) -> (usize, usize) {
        match self {
            Self::Depth => (3, 4),
            Self::DepthSpeed => (3, 5),
            Self::Full => (3, 8),
        }
    }

    /// Arrival time is always the last column.
    pub fn arrival_column(&self) -> usize {
        self.ncols() - 1
    }
}

/// Decoded results for one fgmax grid. All arrays share the grid shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FgmaxResults {
    /// Layout of the valuemax file these came from.
    pub layout: ValueMaxLayout,
    /// AMR level each maximum was recorded on; 0 = never touched.
    pub level: ArrayD<i32>,
    pub x: ArrayD<f64>,
    pub y: ArrayD<f64>,
    /// Topography B at the recording level.
    pub bathymetry: MaskedArray<f64>,
    /// Maximum depth h.
    pub h: MaskedArray<f64>,
    pub h_time: MaskedArray<f64>,
    /// Maximum speed s (8 and 14 column layouts).
    pub s: Option<MaskedArray<f64>>,
    pub s_time: Option<MaskedArray<f64>>,
    /// Maximum momentum hs (14 column layout).
    pub hs: Option<MaskedArray<f64>>,
    pub hs_time: Option<MaskedArray<f64>>,
    /// Maximum momentum flux hss (14 column layout).
    pub hss: Option<MaskedArray<f64>>,
    pub hss_time: Option<MaskedArray<f64>>,
    /// Minimum depth hmin (14 column layout).
    pub hmin: Option<MaskedArray<f64>>,
    pub hmin_time: Option<MaskedArray<f64>>,
    /// Time depth first exceeded `arrival_tol`.
    pub arrival_time: MaskedArray<f64>,
}

impl FgmaxResults {
    /// Shape shared by every field.
    pub fn shape(&self) -> &[usize] {
        self.level.shape()
    }

    /// Midpoint of the y range, for aspect-ratio scaling in plots.
    pub fn mid_latitude(&self) -> Option<f64> {
        let min = self.y.iter().copied().reduce(f64::min)?;
        let max = self.y.iter().copied().reduce(f64::max)?;
        Some(0.5 * (min + max))
    }

    /// Value and time of a quantity, if its layout recorded it.
    pub fn quantity(&self, quantity: Quantity) -> Option<(&MaskedArray<f64>, &MaskedArray<f64>)> {
        fn pair<'a>(
            v: &'a Option<MaskedArray<f64>>,
            t: &'a Option<MaskedArray<f64>>,
        ) -> Option<(&'a MaskedArray<f64>, &'a MaskedArray<f64>)> {
            v.as_ref().zip(t.as_ref())
        }

        match quantity {
            Quantity::Depth => Some((&self.h, &self.h_time)),
            Quantity::Speed => pair(&self.s, &self.s_time),
            Quantity::Momentum => pair(&self.hs, &self.hs_time),
            Quantity::MomentumFlux => pair(&self.hss, &self.hss_time),
            Quantity::MinDepth => pair(&self.hmin, &self.hmin_time),
        }
    }
}

/// Decode loaded valuemax and aux1 tables into grid-shaped fields.
///
/// `order` must match the order the simulator wrote rows in; a mismatch is
/// not detectable here and silently scrambles the fields.
pub fn decode(
    valuemax: &NumericTable,
    valuemax_path: &Path,
    aux: &NumericTable,
    aux_path: &Path,
    shape: &GridShape,
    order: RowOrder,
) -> Result<FgmaxResults> {
    let layout = ValueMaxLayout::from_ncols(valuemax.ncols()).ok_or_else(|| {
        FgmaxError::UnexpectedColumnCount {
            ncols: valuemax.ncols(),
            path: valuemax_path.to_path_buf(),
        }
    })?;

    for (table, path) in [(valuemax, valuemax_path), (aux, aux_path)] {
        if table.nrows() != shape.len() {
            return Err(FgmaxError::ShapeMismatch {
                path: path.to_path_buf(),
                rows: table.nrows(),
                shape: shape.dims().to_vec(),
                expected: shape.len(),
            });
        }
    }
    if aux.ncols() < 3 {
        return Err(FgmaxError::malformed(
            aux_path,
            format!("{} columns, expected x, y and at least one topography level", aux.ncols()),
        ));
    }

    let reshape = |table: &NumericTable, col: usize, path: &Path| -> Result<ArrayD<f64>> {
        ArrayD::from_shape_vec(order.shape(shape.dims()), table.column(col))
            .map_err(|e| FgmaxError::malformed(path, e.to_string()))
    };

    let x = reshape(valuemax, ValueMaxLayout::X, valuemax_path)?;
    let y = reshape(valuemax, ValueMaxLayout::Y, valuemax_path)?;
    let level = reshape(valuemax, ValueMaxLayout::LEVEL, valuemax_path)?.mapv(|v| v as i32);

    let topo = (2..aux.ncols())
        .map(|col| reshape(aux, col, aux_path).map(MaskedArray::masked_sentinel))
        .collect::<Result<Vec<_>>>()?;
    let bathymetry = layer_topography(&level, &topo, aux_path)?;

    let (h_col, h_time_col) = layout.depth_columns();
    let h_raw = reshape(valuemax, h_col, valuemax_path)?;
    // Points never updated during the monitoring window.
    let invalid = h_raw.mapv(|v| v < SENTINEL_THRESHOLD);

    let masked = |col: usize| -> Result<MaskedArray<f64>> {
        Ok(MaskedArray::new(reshape(valuemax, col, valuemax_path)?).mask_with(&invalid))
    };
    let quantity = |q: Quantity| -> Result<(Option<MaskedArray<f64>>, Option<MaskedArray<f64>>)> {
        match layout.columns(q) {
            Some((v, t)) => Ok((Some(masked(v)?), Some(masked(t)?))),
            None => Ok((None, None)),
        }
    };

    let (s, s_time) = quantity(Quantity::Speed)?;
    let (hs, hs_time) = quantity(Quantity::Momentum)?;
    let (hss, hss_time) = quantity(Quantity::MomentumFlux)?;
    let (hmin, hmin_time) = quantity(Quantity::MinDepth)?;

    // A point can be updated yet never reach the arrival threshold.
    let arrival_time = MaskedArray::masked_sentinel(reshape(
        valuemax,
        layout.arrival_column(),
        valuemax_path,
    )?)
    .mask_with(&invalid);

    Ok(FgmaxResults {
        layout,
        level,
        x,
        y,
        bathymetry: bathymetry.mask_with(&invalid),
        h: MaskedArray::new(h_raw).mask_with(&invalid),
        h_time: masked(h_time_col)?,
        s,
        s_time,
        hs,
        hs_time,
        hss,
        hss_time,
        hmin,
        hmin_time,
        arrival_time,
    })
}

/// Build B from per-level topography: `topo[L-1]` where `level == L`,
/// masked where `level == 0`.
fn layer_topography(
    level: &ArrayD<i32>,
    topo: &[MaskedArray<f64>],
    aux_path: &Path,
) -> Result<MaskedArray<f64>> {
    let levelmax = level.iter().copied().max().unwrap_or(0).max(0) as usize;
    if levelmax > topo.len() {
        return Err(FgmaxError::malformed(
            aux_path,
            format!("level {} recorded but only {} topography levels", levelmax, topo.len()),
        ));
    }

    let mut b = topo[0].clone().mask_with(&level.mapv(|l| l == 0));
    for (i, topo_level) in topo.iter().enumerate().take(levelmax) {
        let on_level = level.mapv(|l| l == i as i32 + 1);
        b = b.select_from(&on_level, topo_level);
    }
    Ok(b)
}

fn load_table(path: &Path) -> Result<NumericTable> {
    if !path.is_file() {
        return Err(FgmaxError::FileNotFound(path.to_path_buf()));
    }
    tracing::info!(path = %path.display(), "reading fgmax output");
    NumericTable::load(path)
}

impl GridDescriptor {
    /// Read the results for grid `fgno` from `outdir`, falling back to the
    /// descriptor's own values. Rows are taken in column-major order.
    pub fn read_output(&mut self, fgno: Option<u32>, outdir: Option<&Path>) -> Result<()> {
        self.read_output_with_order(fgno, outdir, RowOrder::ColumnMajor)
    }

    /// Read the results with an explicit row order.
    ///
    /// On error the descriptor is left as it was.
    pub fn read_output_with_order(
        &mut self,
        fgno: Option<u32>,
        outdir: Option<&Path>,
        order: RowOrder,
    ) -> Result<()> {
        let style = self
            .point_style
            .ok_or_else(|| FgmaxError::not_configured("point_style is not set, need to read input?"))?;
        let shape = GridShape::for_style(style, self.npts, (self.nx, self.ny), (self.n12, self.n23))?;

        let fgno = fgno.unwrap_or(self.fgno);
        let outdir: PathBuf = outdir.map(Path::to_path_buf).unwrap_or_else(|| self.outdir.clone());
        let valuemax_path = outdir.join(format!("fort.FG{}.valuemax", fgno));
        let aux_path = outdir.join(format!("fort.FG{}.aux1", fgno));

        let valuemax = load_table(&valuemax_path)?;
        let aux = load_table(&aux_path)?;
        let results = decode(&valuemax, &valuemax_path, &aux, &aux_path, &shape, order)?;

        tracing::debug!(
            fgno,
            shape = ?results.shape(),
            valid = results.h.count(),
            layout = ?results.layout,
            "decoded fgmax output"
        );

        self.fgno = fgno;
        self.outdir = outdir;
        self.results = Some(results);
        Ok(())
    }
}
