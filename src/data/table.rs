//! Numeric Table Module
//! Column-major 2-D table of `f64` values loaded from one data file.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("Column {column} has {found} rows, expected {expected}")]
    RaggedColumn {
        column: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row {row} has {found} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Rectangular table: rows are observations, columns are variables.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl DataTable {
    /// Build a table from column vectors. All columns must have the same length.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let n_rows = columns.first().map(Vec::len).unwrap_or(0);

        if let Some((idx, col)) = columns
            .iter()
            .enumerate()
            .find(|(_, col)| col.len() != n_rows)
        {
            return Err(TableError::RaggedColumn {
                column: idx,
                expected: n_rows,
                found: col.len(),
            });
        }

        Ok(Self { columns, n_rows })
    }

    /// Build a table from row vectors (transposed into columns).
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, TableError> {
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        let mut columns = vec![Vec::with_capacity(rows.len()); n_cols];

        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(TableError::RaggedRow {
                    row: row_idx,
                    expected: n_cols,
                    found: row.len(),
                });
            }
            for (col, &value) in columns.iter_mut().zip(row) {
                col.push(value);
            }
        }

        Ok(Self {
            columns,
            n_rows: rows.len(),
        })
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }

    /// Get one column by index.
    pub fn column(&self, idx: usize) -> Option<&[f64]> {
        self.columns.get(idx).map(Vec::as_slice)
    }

    /// Iterate over columns in order.
    pub fn columns(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.columns.iter().map(Vec::as_slice)
    }
}
