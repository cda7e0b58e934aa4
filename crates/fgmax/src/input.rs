//! The simulator's fgmax input file.
//!
//! # Layout
//!
//! ```text
//! line 1  tstart_max
//! line 2  tend_max
//! line 3  dt_check
//! line 4  min_level_check
//! line 5  arrival_tol
//! line 6  point_style
//! line 7  npts | nx ny | n12 n23
//! line 8+ style 1: x y per point; styles 2/3: corners
//! ```
//!
//! Only the leading token(s) of lines 1-7 are significant; the rest of each
//! line is free-form comment. The numeric formats differ between styles and
//! must be kept byte for byte, since the simulator reads them with a
//! fixed-format reader.

use std::fs;
use std::path::Path;

use crate::descriptor::GridDescriptor;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{FgmaxError, Result};
use crate::format::{general, int, sci};
use crate::geometry::{self, ResolvedGeometry};
use crate::overlay::{overlay_target, KmlExporter, Overlay, OverlayExporter, DEFAULT_COLOR};
use crate::table::{parse_float, NumericTable};
use crate::types::PointStyle;

/// Kind of a positional input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Float,
    Int,
}

/// A named positional field of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> Field {
    Field { name, kind }
}

/// Lines 1-6, one leading token each.
pub const HEADER_SCHEMA: [Field; 6] = [
    field("tstart_max", FieldKind::Float),
    field("tend_max", FieldKind::Float),
    field("dt_check", FieldKind::Float),
    field("min_level_check", FieldKind::Int),
    field("arrival_tol", FieldKind::Float),
    field("point_style", FieldKind::Int),
];

/// Line 7 tokens for a style.
pub fn count_schema(style: PointStyle) -> &'static [Field] {
    const NPTS: [Field; 1] = [field("npts", FieldKind::Int)];
    const NX_NY: [Field; 2] = [field("nx", FieldKind::Int), field("ny", FieldKind::Int)];
    const N12_N23: [Field; 2] = [field("n12", FieldKind::Int), field("n23", FieldKind::Int)];

    match style {
        PointStyle::PointCount | PointStyle::PointList => &NPTS,
        PointStyle::Rectangular => &NX_NY,
        PointStyle::Quadrilateral => &N12_N23,
    }
}

/// A parsed field value.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value {
    Float(f64),
    Int(i64),
}

impl Value {
    fn as_f64(self) -> f64 {
        match self {
            Self::Float(v) => v,
            Self::Int(v) => v as f64,
        }
    }

    fn as_i64(self) -> i64 {
        match self {
            Self::Int(v) => v,
            Self::Float(v) => v as i64,
        }
    }
}

fn parse_value(tok: &str, f: &Field, path: &Path, line: usize) -> Result<Value> {
    let bad = || FgmaxError::parse(path, line, format!("invalid {} '{}'", f.name, tok));
    match f.kind {
        FieldKind::Float => parse_float(tok).map(Value::Float).ok_or_else(bad),
        FieldKind::Int => match tok.parse::<i64>() {
            Ok(v) => Ok(Value::Int(v)),
            // "%g" writes integral values without a point, but be lenient.
            Err(_) => parse_float(tok)
                .filter(|v| v.fract() == 0.0)
                .map(|v| Value::Int(v as i64))
                .ok_or_else(bad),
        },
    }
}

/// Read the fields of `schema` from the leading tokens of one line.
fn read_fields(line: Option<&str>, schema: &[Field], path: &Path, lineno: usize) -> Result<Vec<Value>> {
    let line = line.ok_or_else(|| {
        FgmaxError::parse(path, lineno, format!("missing line for {}", schema[0].name))
    })?;
    let mut tokens = line.split_whitespace();

    schema
        .iter()
        .map(|f| {
            let tok = tokens
                .next()
                .ok_or_else(|| FgmaxError::parse(path, lineno, format!("missing {}", f.name)))?;
            parse_value(tok, f, path, lineno)
        })
        .collect()
}

fn to_count(value: Value, name: &str, path: &Path, line: usize) -> Result<usize> {
    usize::try_from(value.as_i64())
        .map_err(|_| FgmaxError::parse(path, line, format!("{} must be non-negative", name)))
}

/// Everything the reader extracts, applied to a descriptor in one step.
#[derive(Debug, Clone, PartialEq)]
struct ParsedInput {
    tstart_max: f64,
    tend_max: f64,
    dt_check: f64,
    min_level_check: i64,
    arrival_tol: f64,
    point_style: PointStyle,
    counts: Vec<usize>,
    points: Option<Vec<(f64, f64)>>,
}

fn parse_input(text: &str, path: &Path) -> Result<ParsedInput> {
    let lines: Vec<&str> = text.lines().collect();

    let mut header = Vec::with_capacity(HEADER_SCHEMA.len());
    for (i, f) in HEADER_SCHEMA.iter().enumerate() {
        let values = read_fields(lines.get(i).copied(), std::slice::from_ref(f), path, i + 1)?;
        header.push(values[0]);
    }

    let style_code = header[5].as_i64();
    let point_style = PointStyle::from_code(style_code)
        .ok_or_else(|| FgmaxError::unsupported_style(style_code, "read_input_data"))?;

    let schema = count_schema(point_style);
    let counts = read_fields(lines.get(6).copied(), schema, path, 7)?
        .into_iter()
        .zip(schema)
        .map(|(v, f)| to_count(v, f.name, path, 7))
        .collect::<Result<Vec<_>>>()?;

    // Corners of styles 2 and 3 are not read back.
    let points = if point_style == PointStyle::PointList {
        let table = NumericTable::parse_lines(lines.iter().skip(7).copied(), 7, path)?;
        if !table.is_empty() && table.ncols() != 2 {
            return Err(FgmaxError::malformed(
                path,
                format!("point list has {} columns, expected 2", table.ncols()),
            ));
        }
        Some(table.rows().map(|r| (r[0], r[1])).collect())
    } else {
        None
    };

    Ok(ParsedInput {
        tstart_max: header[0].as_f64(),
        tend_max: header[1].as_f64(),
        dt_check: header[2].as_f64(),
        min_level_check: header[3].as_i64(),
        arrival_tol: header[4].as_f64(),
        point_style,
        counts,
        points,
    })
}

/// Render the input file for a resolved geometry.
pub fn render_input(fg: &GridDescriptor, geometry: &ResolvedGeometry) -> Result<String> {
    let min_level = fg
        .min_level_check
        .ok_or_else(|| FgmaxError::not_configured("min_level_check must be set"))?;
    let style = geometry.point_style().code();
    let mut out = String::new();

    match geometry {
        ResolvedGeometry::Rectangular { nx, ny, bbox, .. } => {
            let pad16 = " ".repeat(16);
            out.push_str(&format!("{}            # tstart_max\n", sci(fg.tstart_max, 16, 10)));
            out.push_str(&format!("{}            # tend_max\n", sci(fg.tend_max, 16, 10)));
            out.push_str(&format!("{}            # dt_check\n", sci(fg.dt_check, 16, 10)));
            out.push_str(&format!("{} {}              # min_level_check\n", int(min_level), pad16));
            out.push_str(&format!("{}            # arrival_tol\n", sci(fg.arrival_tol, 16, 10)));
            out.push_str(&format!("{} {}              # point_style\n", int(style), pad16));
            out.push_str(&format!("{}  {} {}          # nx,ny\n", nx, ny, " ".repeat(10)));
            out.push_str(&corner_line(bbox.x1, bbox.y1, "x1, y1"));
            out.push_str(&corner_line(bbox.x2, bbox.y2, "x2, y2"));
        }
        ResolvedGeometry::Transect {
            npts, start, end, ..
        } => {
            push_general_header(&mut out, fg, min_level, style);
            out.push_str(&format!("{}                 # npts\n", npts));
            out.push_str(&format!("{}   {}            # x1, y1\n", general(start.0), general(start.1)));
            out.push_str(&format!("{}   {}            # x2, y2\n", general(end.0), general(end.1)));
        }
        ResolvedGeometry::Quadrilateral { n12, n23, corners } => {
            push_general_header(&mut out, fg, min_level, style);
            out.push_str(&format!("{}  {} {}          # n12,n23\n", n12, n23, " ".repeat(10)));
            for (k, (x, y)) in corners.iter().enumerate() {
                out.push_str(&corner_line(*x, *y, &format!("x{0}, y{0}", k + 1)));
            }
        }
    }

    Ok(out)
}

fn push_general_header(out: &mut String, fg: &GridDescriptor, min_level: i64, style: i64) {
    out.push_str(&format!("{}                 # tstart_max\n", general(fg.tstart_max)));
    out.push_str(&format!("{}                 # tend_max\n", general(fg.tend_max)));
    out.push_str(&format!("{}                 # dt_check\n", general(fg.dt_check)));
    out.push_str(&format!("{}                 # min_level_check\n", int(min_level)));
    out.push_str(&format!("{}                 # arrival_tol\n", general(fg.arrival_tol)));
    out.push_str(&format!("{}                 # point_style\n", general(style as f64)));
}

fn corner_line(x: f64, y: f64, label: &str) -> String {
    format!("{}   {}            # {}\n", sci(x, 16, 10), sci(y, 20, 10), label)
}

impl GridDescriptor {
    /// Read input parameters from a file written by [`Self::write_input_data`]
    /// (or by hand). Defaults to `self.input_file_name`.
    ///
    /// Corner coordinates of styles 2 and 3 are not read back.
    pub fn read_input_data(&mut self, input_file_name: Option<&Path>) -> Result<()> {
        let path = input_file_name
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.input_file_name.clone());
        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FgmaxError::FileNotFound(path.clone()),
            _ => FgmaxError::Io(e),
        })?;
        let parsed = parse_input(&text, &path)?;

        // Counts of the other styles are cleared, not left stale.
        let (npts, lattice, quad) = match parsed.point_style {
            PointStyle::PointCount | PointStyle::PointList => (Some(parsed.counts[0]), None, None),
            PointStyle::Rectangular => (None, Some((parsed.counts[0], parsed.counts[1])), None),
            PointStyle::Quadrilateral => (None, None, Some((parsed.counts[0], parsed.counts[1]))),
        };

        self.tstart_max = parsed.tstart_max;
        self.tend_max = parsed.tend_max;
        self.dt_check = parsed.dt_check;
        self.min_level_check = Some(parsed.min_level_check);
        self.arrival_tol = parsed.arrival_tol;
        self.point_style = Some(parsed.point_style);
        self.npts = npts;
        self.nx = lattice.map(|(nx, _)| nx);
        self.ny = lattice.map(|(_, ny)| ny);
        self.n12 = quad.map(|(n12, _)| n12);
        self.n23 = quad.map(|(_, n23)| n23);
        self.points = parsed.points;
        self.input_file_name = path.clone();

        tracing::debug!(
            path = %path.display(),
            point_style = %parsed.point_style,
            "read fgmax input"
        );
        Ok(())
    }

    /// Write the simulator input file, logging geometry corrections through
    /// `tracing` and writing a KML overlay next to it.
    pub fn write_input_data(&mut self, input_file_name: Option<&Path>) -> Result<ResolvedGeometry> {
        self.write_input_data_with(input_file_name, &KmlExporter, &TracingDiagnostics)
    }

    /// Write the simulator input file with an explicit overlay exporter and
    /// diagnostics sink.
    ///
    /// Geometry is resolved before anything is written, so configuration
    /// errors leave no partial files behind.
    pub fn write_input_data_with(
        &mut self,
        input_file_name: Option<&Path>,
        exporter: &dyn OverlayExporter,
        diagnostics: &dyn Diagnostics,
    ) -> Result<ResolvedGeometry> {
        let path = input_file_name
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.input_file_name.clone());

        let geometry = geometry::resolve(self, diagnostics)?;
        let contents = render_input(self, &geometry)?;

        fs::write(&path, contents)?;
        self.input_file_name = path;
        tracing::info!(
            path = %self.input_file_name.display(),
            point_style = %geometry.point_style(),
            npts = geometry.npts(),
            "created fgmax input file"
        );
        log_geometry(&geometry);

        if let Some(overlay) = Overlay::for_geometry(&geometry) {
            let (kml_path, label) = overlay_target(&self.input_file_name);
            exporter.export(&overlay, &kml_path, &label, DEFAULT_COLOR)?;
        }

        Ok(geometry)
    }
}

fn log_geometry(geometry: &ResolvedGeometry) {
    match geometry {
        ResolvedGeometry::Rectangular {
            nx, ny, dx, dy, bbox,
        } => tracing::info!(
            nx,
            ny,
            dx,
            dy,
            lower_left = ?(bbox.x1, bbox.y1),
            upper_right = ?(bbox.x2, bbox.y2),
            "fixed grid"
        ),
        ResolvedGeometry::Transect {
            npts, dx, start, end,
        } => tracing::info!(npts, dx, start = ?start, end = ?end, "fixed transect"),
        ResolvedGeometry::Quadrilateral { n12, n23, corners } => {
            tracing::info!(n12, n23, corners = ?corners, "fixed quadrilateral")
        }
    }
}
