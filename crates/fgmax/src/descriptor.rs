//! The fgmax grid descriptor.
//!
//! A [`GridDescriptor`] carries everything known about one fgmax grid: the
//! geometry and monitoring parameters written to the simulator's input file,
//! and, after [`GridDescriptor::read_output`], the decoded results.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::output::FgmaxResults;
use crate::types::{GridShape, PointStyle};

/// Input parameters and decoded results for one fgmax grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridDescriptor {
    /// Geometry family; unset until read from a file or assigned.
    pub point_style: Option<PointStyle>,

    /// Number of points for styles 0 and 1.
    pub npts: Option<usize>,
    /// Lattice size for style 2.
    pub nx: Option<usize>,
    pub ny: Option<usize>,
    /// Edge subdivisions for style 3.
    pub n12: Option<usize>,
    pub n23: Option<usize>,

    /// Corners. Styles 1 and 2 use corners 1 and 2, style 3 all four.
    pub x1: Option<f64>,
    pub y1: Option<f64>,
    pub x2: Option<f64>,
    pub y2: Option<f64>,
    pub x3: Option<f64>,
    pub y3: Option<f64>,
    pub x4: Option<f64>,
    pub y4: Option<f64>,

    /// Point spacing, used when the matching count is unset.
    pub dx: Option<f64>,
    pub dy: Option<f64>,

    /// Explicit point coordinates read back for style 1.
    pub points: Option<Vec<(f64, f64)>>,

    /// Start of the monitoring window (seconds).
    pub tstart_max: f64,
    /// End of the monitoring window (seconds).
    pub tend_max: f64,
    /// Target interval between max updates (seconds).
    pub dt_check: f64,
    /// Minimum AMR level at which maxima are updated.
    pub min_level_check: Option<i64>,
    /// Depth above which the wave counts as arrived.
    pub arrival_tol: f64,

    /// Input file written for the simulator.
    pub input_file_name: PathBuf,
    /// Grid number; selects `fort.FG<fgno>.*` output files.
    pub fgno: u32,
    /// Simulator output directory.
    pub outdir: PathBuf,

    /// Results decoded by `read_output`.
    #[serde(skip)]
    pub results: Option<FgmaxResults>,
}

impl Default for GridDescriptor {
    fn default() -> Self {
        Self {
            point_style: None,
            npts: None,
            nx: None,
            ny: None,
            n12: None,
            n23: None,
            x1: None,
            y1: None,
            x2: None,
            y2: None,
            x3: None,
            y3: None,
            x4: None,
            y4: None,
            dx: None,
            dy: None,
            points: None,
            tstart_max: 0.0,
            tend_max: 1e10,
            dt_check: 10.0,
            min_level_check: None,
            arrival_tol: 1e-2,
            input_file_name: PathBuf::from("fgmax.txt"),
            fgno: 1,
            outdir: PathBuf::from("_output"),
            results: None,
        }
    }
}

impl GridDescriptor {
    /// Create an empty descriptor with default monitoring parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse descriptor attributes from YAML. Unlisted fields keep defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load descriptor attributes from a YAML file.
    pub fn load_yaml(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let descriptor = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), fgno = descriptor.fgno, "loaded fgmax descriptor");
        Ok(descriptor)
    }

    /// Validate the monitoring parameters.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.tstart_max > self.tend_max {
            return Err("tstart_max must be <= tend_max".to_string());
        }

        if self.dt_check < 0.0 {
            return Err("dt_check must be >= 0".to_string());
        }

        if self.arrival_tol < 0.0 {
            return Err("arrival_tol must be >= 0".to_string());
        }

        Ok(())
    }

    /// Shape of the decoded fields, if the style and its counts are set.
    pub fn grid_shape(&self) -> Option<GridShape> {
        let style = self.point_style?;
        GridShape::for_style(style, self.npts, (self.nx, self.ny), (self.n12, self.n23)).ok()
    }

    /// Path of the per-point maxima file for this grid.
    pub fn valuemax_path(&self) -> PathBuf {
        self.outdir.join(format!("fort.FG{}.valuemax", self.fgno))
    }

    /// Path of the per-point topography file for this grid.
    pub fn aux1_path(&self) -> PathBuf {
        self.outdir.join(format!("fort.FG{}.aux1", self.fgno))
    }
}
