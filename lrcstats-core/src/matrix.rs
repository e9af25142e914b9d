//! Dense DP matrix shared by both aligners
//!
//! Cells live in one contiguous row-major buffer. Allocation is fallible and
//! all-or-nothing: a failed request leaves the matrix empty.

use std::fmt;

use crate::cost::{Cost, INFEASIBLE};
use crate::error::{AlignError, AlignResult};

#[derive(Debug, Clone, Default)]
pub struct DpMatrix {
    cells: Vec<Cost>,
    rows: usize,
    columns: usize,
}

impl DpMatrix {
    /// Allocate a zeroed `rows x columns` matrix.
    pub fn with_shape(rows: usize, columns: usize, max_cells: Option<usize>) -> AlignResult<Self> {
        let mut matrix = Self::default();
        matrix.reshape(rows, columns, max_cells)?;
        Ok(matrix)
    }

    /// Resize for a new alignment, reusing the buffer when it is big enough.
    pub fn reshape(&mut self, rows: usize, columns: usize, max_cells: Option<usize>) -> AlignResult<()> {
        self.cells.clear();
        self.rows = 0;
        self.columns = 0;

        let len = rows
            .checked_mul(columns)
            .ok_or_else(|| AlignError::allocation(rows, columns, "cell count overflows"))?;

        if let Some(limit) = max_cells {
            if len > limit {
                log::warn!("DP matrix of {} cells exceeds configured limit of {}", len, limit);
                return Err(AlignError::allocation(
                    rows,
                    columns,
                    format!("{len} cells exceed the configured limit of {limit}"),
                ));
            }
        }

        if let Err(err) = self.cells.try_reserve_exact(len) {
            log::warn!("DP matrix allocation of {}x{} failed: {}", rows, columns, err);
            self.cells = Vec::new();
            return Err(AlignError::allocation(rows, columns, err.to_string()));
        }

        self.cells.resize(len, 0);
        self.rows = rows;
        self.columns = columns;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, row: usize, column: usize) -> usize {
        debug_assert!(row < self.rows && column < self.columns);
        row * self.columns + column
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> Cost {
        self.cells[self.index(row, column)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, column: usize, cost: Cost) {
        let index = self.index(row, column);
        self.cells[index] = cost;
    }

    pub fn row(&self, row: usize) -> &[Cost] {
        let start = self.index(row, 0);
        &self.cells[start..start + self.columns]
    }

    /// Column 0 holds the cost of inserting every corrected base so far;
    /// row 0 is variant specific.
    pub fn fill_base_cases<F>(&mut self, first_row: F)
    where
        F: Fn(usize) -> Cost,
    {
        for row in 0..self.rows {
            self.set(row, 0, row as Cost);
        }
        for column in 1..self.columns {
            self.set(0, column, first_row(column));
        }
    }

    /// Cost of the full alignment held in the bottom-right cell
    pub fn final_cost(&self) -> Option<Cost> {
        self.cells.last().copied()
    }
}

impl fmt::Display for DpMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            let line = self
                .row(row)
                .iter()
                .map(|&cost| {
                    if cost == INFEASIBLE {
                        "-".to_string()
                    } else {
                        cost.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
