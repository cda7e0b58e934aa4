//! Whitespace-delimited numeric tables.
//!
//! Both simulator output files and the point list of an input file are plain
//! tables: one row per line, columns split on whitespace, `#` starting a
//! comment, blank lines ignored.

use std::fs;
use std::path::Path;

use crate::error::{FgmaxError, Result};

/// A rectangular table of numbers stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    values: Vec<f64>,
    nrows: usize,
    ncols: usize,
}

impl NumericTable {
    /// Load a table from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::parse_lines(text.lines(), 0, path)
    }

    /// Parse table rows from `lines`.
    ///
    /// `first_line` is the 1-based number of the first line minus one, used
    /// only for error messages; `path` names the source in errors.
    pub fn parse_lines<'a>(
        lines: impl IntoIterator<Item = &'a str>,
        first_line: usize,
        path: &Path,
    ) -> Result<Self> {
        let mut values = Vec::new();
        let mut nrows = 0;
        let mut ncols = None;

        for (offset, line) in lines.into_iter().enumerate() {
            let content = line.split('#').next().unwrap_or("");
            let row = content
                .split_whitespace()
                .map(|tok| {
                    parse_float(tok).ok_or_else(|| {
                        FgmaxError::parse(
                            path,
                            first_line + offset + 1,
                            format!("invalid number '{}'", tok),
                        )
                    })
                })
                .collect::<Result<Vec<f64>>>()?;

            if row.is_empty() {
                continue;
            }

            match ncols {
                None => ncols = Some(row.len()),
                Some(n) if n != row.len() => {
                    return Err(FgmaxError::malformed(
                        path,
                        format!(
                            "line {} has {} columns, expected {}",
                            first_line + offset + 1,
                            row.len(),
                            n
                        ),
                    ));
                }
                Some(_) => {}
            }

            values.extend(row);
            nrows += 1;
        }

        Ok(Self {
            values,
            nrows,
            ncols: ncols.unwrap_or(0),
        })
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns (0 for an empty table).
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.nrows == 0
    }

    /// Copy out one column.
    ///
    /// # Panics
    /// Panics if `col >= self.ncols()`.
    pub fn column(&self, col: usize) -> Vec<f64> {
        assert!(col < self.ncols, "column {} out of range", col);
        self.values
            .chunks_exact(self.ncols)
            .map(|row| row[col])
            .collect()
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.ncols.max(1))
    }
}

/// Parse a number, accepting Fortran `D` exponents.
pub(crate) fn parse_float(tok: &str) -> Option<f64> {
    tok.parse()
        .ok()
        .or_else(|| tok.replace(['d', 'D'], "e").parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<NumericTable> {
        NumericTable::parse_lines(text.lines(), 0, Path::new("test.txt"))
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let table = parse("# header\n1 2 3\n\n4 5 6  # trailing\n").unwrap();
        assert_eq!(table.nrows(), 2);
        assert_eq!(table.ncols(), 3);
        assert_eq!(table.column(1), vec![2.0, 5.0]);
        assert_eq!(table.rows().nth(1), Some(&[4.0, 5.0, 6.0][..]));
    }

    #[test]
    fn test_parse_scientific_and_fortran_exponent() {
        let table = parse("1.5e+02 -9.999D+99\n").unwrap();
        assert_eq!(table.column(0), vec![150.0]);
        assert_eq!(table.column(1), vec![-9.999e99]);
    }

    #[test]
    fn test_ragged_table_is_malformed() {
        let err = parse("1 2 3\n4 5\n").unwrap_err();
        assert!(matches!(err, FgmaxError::MalformedTable { .. }));
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_bad_token_reports_line() {
        let err = NumericTable::parse_lines("1 2\n3 x\n".lines(), 7, Path::new("in.txt")).unwrap_err();
        match err {
            FgmaxError::Parse { line, .. } => assert_eq!(line, 9),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_table() {
        let table = parse("# nothing\n\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.ncols(), 0);
        assert_eq!(table.rows().count(), 0);
    }
}
