//! Generators for synthetic simulator output.
//!
//! Rows are produced the way the simulator writes them: for a lattice of
//! shape `(n1, n2)` the first index varies fastest. Every value encodes the
//! grid index it belongs to, so a decoder that reshapes in the wrong order
//! fails loudly in tests instead of silently.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::paths::{aux1_path, valuemax_path};

/// The simulator's "no data" value.
pub const NO_DATA: f64 = -9.99999e99;

/// Index-encoding value for grid point `(i, j)`: `i * 1000 + j`.
///
/// # Example
///
/// ```
/// use test_utils::index_value;
///
/// assert_eq!(index_value(0, 0), 0.0);
/// assert_eq!(index_value(2, 1), 2001.0);
/// ```
pub fn index_value(i: usize, j: usize) -> f64 {
    (i * 1000 + j) as f64
}

/// Expected content of valuemax column `col` (3 and up) at `(i, j)`.
pub fn quantity_value(i: usize, j: usize, col: usize) -> f64 {
    index_value(i, j) + col as f64 / 100.0
}

/// Expected topography of AMR level `level` at `(i, j)`.
pub fn topo_value(i: usize, j: usize, level: usize) -> f64 {
    -(index_value(i, j) + level as f64 / 10.0)
}

/// Grid indices `(i, j)` in simulator row order for shape `(n1, n2)`.
pub fn column_major_indices(n1: usize, n2: usize) -> Vec<(usize, usize)> {
    let mut indices = Vec::with_capacity(n1 * n2);
    for j in 0..n2 {
        for i in 0..n1 {
            indices.push((i, j));
        }
    }
    indices
}

/// Creates valuemax rows for an `(n1, n2)` lattice.
///
/// Columns: `x = i`, `y = j`, `level = level_of(i, j)`, then
/// [`quantity_value`] for every remaining column up to `ncols`.
pub fn valuemax_rows(
    n1: usize,
    n2: usize,
    ncols: usize,
    level_of: impl Fn(usize, usize) -> u32,
) -> Vec<Vec<f64>> {
    column_major_indices(n1, n2)
        .into_iter()
        .map(|(i, j)| {
            let mut row = vec![i as f64, j as f64, level_of(i, j) as f64];
            row.extend((3..ncols).map(|col| quantity_value(i, j, col)));
            row
        })
        .collect()
}

/// Creates aux1 rows for an `(n1, n2)` lattice with `nlevels` topography columns.
pub fn aux_rows(n1: usize, n2: usize, nlevels: usize) -> Vec<Vec<f64>> {
    column_major_indices(n1, n2)
        .into_iter()
        .map(|(i, j)| {
            let mut row = vec![i as f64, j as f64];
            row.extend((1..=nlevels).map(|level| topo_value(i, j, level)));
            row
        })
        .collect()
}

/// Overwrites one cell of a row set, addressing it by grid index.
pub fn set_cell(rows: &mut [Vec<f64>], n1: usize, (i, j): (usize, usize), col: usize, value: f64) {
    rows[j * n1 + i][col] = value;
}

/// Writes rows as a whitespace-delimited table in the simulator's style.
pub fn write_table(path: &Path, rows: &[Vec<f64>]) -> io::Result<()> {
    let text: String = rows
        .iter()
        .map(|row| {
            let mut line = row
                .iter()
                .map(|v| format!("{:>24e}", v))
                .collect::<Vec<_>>()
                .join(" ");
            line.push('\n');
            line
        })
        .collect();
    fs::write(path, text)
}

/// Writes `fort.FG<fgno>.valuemax` and `fort.FG<fgno>.aux1` into `outdir`.
pub fn write_run(
    outdir: &Path,
    fgno: u32,
    valuemax: &[Vec<f64>],
    aux: &[Vec<f64>],
) -> io::Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(outdir)?;
    let v = valuemax_path(outdir, fgno);
    let a = aux1_path(outdir, fgno);
    write_table(&v, valuemax)?;
    write_table(&a, aux)?;
    Ok((v, a))
}
