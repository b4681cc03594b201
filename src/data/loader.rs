//! CSV Data Loader Module
//! Loads headerless numeric CSV files into a `DataTable` using Polars.

use super::table::{DataTable, TableError};
use polars::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to load CSV {}: {source}", path.display())]
    CsvError {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("{}: row {row}, column {column}: cannot parse {value:?} as a number", path.display())]
    NonNumeric {
        path: PathBuf,
        row: usize,
        column: usize,
        value: String,
    },
    #[error("{}: row {row}, column {column}: missing value", path.display())]
    MissingValue {
        path: PathBuf,
        row: usize,
        column: usize,
    },
    #[error("{}: no data rows", path.display())]
    NoData { path: PathBuf },
    #[error("{}: {source}", path.display())]
    Shape {
        path: PathBuf,
        #[source]
        source: TableError,
    },
}

/// Source of numeric tables, one per input file.
pub trait TableLoader {
    fn load(&mut self, path: &Path) -> Result<DataTable, LoaderError>;
}

/// Reads comma-separated numeric files with Polars.
///
/// Files have no header row. Lines starting with `#` are skipped. Every cell
/// must be a number; integer columns are widened to `f64` and text columns are
/// parsed cell by cell so padded values such as `" 2.5"` are accepted.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    separator: u8,
    comment_prefix: Option<String>,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self {
            separator: b',',
            comment_prefix: Some("#".to_string()),
        }
    }

    fn read_frame(&self, path: &Path) -> PolarsResult<DataFrame> {
        // Scan the whole file for schema inference so a bad cell deep in a
        // column still turns that column into text.
        let mut reader = LazyCsvReader::new(path)
            .with_has_header(false)
            .with_separator(self.separator)
            .with_infer_schema_length(None);

        if let Some(prefix) = &self.comment_prefix {
            reader = reader.with_comment_prefix(Some(prefix.as_str().into()));
        }

        reader.finish()?.collect()
    }

    fn frame_to_table(path: &Path, df: &DataFrame) -> Result<DataTable, LoaderError> {
        let blank = Self::blank_rows(df);
        let columns = df
            .get_columns()
            .iter()
            .enumerate()
            .map(|(idx, column)| Self::column_values(path, idx, column, &blank))
            .collect::<Result<Vec<_>, _>>()?;

        let table = DataTable::from_columns(columns).map_err(|source| LoaderError::Shape {
            path: path.to_path_buf(),
            source,
        })?;
        if table.is_empty() {
            return Err(LoaderError::NoData {
                path: path.to_path_buf(),
            });
        }
        Ok(table)
    }

    /// Rows where every cell is null. The reader turns blank lines into such
    /// rows; they carry no data and are skipped.
    fn blank_rows(df: &DataFrame) -> Vec<bool> {
        let mut blank = vec![true; df.height()];
        for column in df.get_columns() {
            let nulls = column.as_materialized_series().is_null();
            for (row, is_null) in (&nulls).into_iter().enumerate() {
                if is_null != Some(true) {
                    blank[row] = false;
                }
            }
        }
        blank
    }

    /// Convert one Polars column into `f64` values, leaving out blank rows.
    ///
    /// Reported rows count every data row of the file, blank ones included.
    fn column_values(
        path: &Path,
        idx: usize,
        column: &Column,
        blank: &[bool],
    ) -> Result<Vec<f64>, LoaderError> {
        let csv_error = |source: PolarsError| LoaderError::CsvError {
            path: path.to_path_buf(),
            source,
        };
        let missing = |row: usize| LoaderError::MissingValue {
            path: path.to_path_buf(),
            row: row + 1,
            column: idx + 1,
        };

        if Self::is_numeric(column.dtype()) {
            let values = column.cast(&DataType::Float64).map_err(csv_error)?;
            let ca = values.f64().map_err(csv_error)?;

            return ca
                .into_iter()
                .enumerate()
                .filter(|(row, _)| !blank[*row])
                .map(|(row, value)| value.ok_or_else(|| missing(row)))
                .collect();
        }

        let text = column.cast(&DataType::String).map_err(csv_error)?;
        let ca = text.as_materialized_series().str().map_err(csv_error)?;

        ca.into_iter()
            .enumerate()
            .filter(|(row, _)| !blank[*row])
            .map(|(row, cell)| {
                let cell = cell.ok_or_else(|| missing(row))?;
                Self::parse_cell(cell).ok_or_else(|| LoaderError::NonNumeric {
                    path: path.to_path_buf(),
                    row: row + 1,
                    column: idx + 1,
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    fn is_numeric(dtype: &DataType) -> bool {
        matches!(
            dtype,
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        )
    }

    /// Parse a text cell, accepting surrounding whitespace and `nan`/`inf`.
    fn parse_cell(cell: &str) -> Option<f64> {
        cell.trim().parse::<f64>().ok()
    }
}

impl TableLoader for CsvLoader {
    fn load(&mut self, path: &Path) -> Result<DataTable, LoaderError> {
        let metadata = fs::metadata(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.len() == 0 {
            return Err(LoaderError::NoData {
                path: path.to_path_buf(),
            });
        }

        let df = self
            .read_frame(path)
            .map_err(|source| LoaderError::CsvError {
                path: path.to_path_buf(),
                source,
            })?;
        let table = Self::frame_to_table(path, &df)?;

        debug!(
            path = %path.display(),
            rows = table.n_rows(),
            cols = table.n_cols(),
            "Loaded table"
        );
        Ok(table)
    }
}
