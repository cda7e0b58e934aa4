//! Scratch directories and simulator output paths for tests.

use std::path::{Path, PathBuf};

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Creates a temporary directory with a specific prefix.
///
/// # Arguments
///
/// * `prefix` - A prefix for the directory name (e.g., "fgmax_run_")
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// Path the simulator uses for the per-point maxima of grid `fgno`.
pub fn valuemax_path(outdir: &Path, fgno: u32) -> PathBuf {
    outdir.join(format!("fort.FG{}.valuemax", fgno))
}

/// Path the simulator uses for the per-point topography of grid `fgno`.
pub fn aux1_path(outdir: &Path, fgno: u32) -> PathBuf {
    outdir.join(format!("fort.FG{}.aux1", fgno))
}
