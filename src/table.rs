//! CSV-backed tabular dataset.
//!
//! A [`Table`] preserves the input file's column order, row order, and raw
//! cell text. Raw cells are echoed verbatim into the output CSV; the numeric
//! view used for preprocessing is materialized separately via
//! [`Table::to_matrix`].
//!
//! Missing values: empty cells and the common NA spellings (`NA`, `NaN`,
//! case-insensitive) become `f32::NAN` in the numeric view. Any other
//! non-numeric cell is a [`TransformError::NonNumericCell`] — the transform
//! layer is numeric-only.

use std::io::Read;
use std::path::Path;

use ndarray::Array2;

use crate::transform::TransformError;

/// In-memory tabular dataset with a header row.
#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table from column names and row cells.
    ///
    /// # Panics
    ///
    /// Panics if any row's length differs from the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(
                row.len(),
                columns.len(),
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                columns.len()
            );
        }
        Self { columns, rows }
    }

    /// Read a table from a CSV file with a header row.
    ///
    /// Row and column order are preserved. Ragged rows are rejected by the
    /// underlying reader.
    pub fn read_csv(path: &Path) -> Result<Self, csv::Error> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_reader(reader)
    }

    /// Read a table from any CSV reader.
    pub fn from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, csv::Error> {
        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|field| field.to_string())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|field| field.to_string()).collect());
        }

        Ok(Self { columns, rows })
    }

    /// Number of rows (excluding the header).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    #[inline]
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Column names, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Raw cell text at (row, column).
    pub fn cell(&self, row: usize, column: usize) -> &str {
        &self.rows[row][column]
    }

    /// Materialize the numeric view of the table.
    ///
    /// Empty and NA-spelled cells become NaN; any other cell that does not
    /// parse as a number is an error naming the offending cell.
    pub fn to_matrix(&self) -> Result<Array2<f32>, TransformError> {
        let mut data = Vec::with_capacity(self.n_rows() * self.n_columns());
        for (i, row) in self.rows.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                data.push(parse_cell(cell).ok_or_else(|| {
                    TransformError::NonNumericCell {
                        row: i,
                        column: self.columns[j].clone(),
                        value: cell.clone(),
                    }
                })?);
            }
        }

        // Lengths are consistent by construction, so the shape always fits.
        Ok(Array2::from_shape_vec((self.n_rows(), self.n_columns()), data)
            .expect("row lengths validated at construction"))
    }

    /// Append a trailing column.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per row.
    pub fn push_column(&mut self, name: &str, values: Vec<String>) {
        assert_eq!(
            values.len(),
            self.n_rows(),
            "column {:?} has {} values, expected {}",
            name,
            values.len(),
            self.n_rows()
        );
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    /// Write the table to a CSV file with a header row and no index column.
    pub fn write_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Parse a single cell: `None` means "not a number", NaN means "missing".
fn parse_cell(cell: &str) -> Option<f32> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") || trimmed.eq_ignore_ascii_case("nan")
    {
        return Some(f32::NAN);
    }
    trimmed.parse::<f32>().ok()
}
