use super::Document;
use super::state::{default_column_header, default_row_header};
use crate::error::{GridError, Result};
use gridcalc_engine::engine::{
    Cell, CellRef, MAX_COLS, MAX_ROWS, ShiftOperation, ShiftOutcome, shift_formula_references,
    shift_single_ref,
};
use std::collections::BTreeSet;

/// Dimension for row/column operations
#[derive(Copy, Clone, Debug)]
enum Dimension {
    Row,
    Column,
}

impl Dimension {
    /// Get the coordinate value from a CellRef for this dimension
    fn get_coord(&self, cell_ref: &CellRef) -> usize {
        match self {
            Dimension::Row => cell_ref.row,
            Dimension::Column => cell_ref.col,
        }
    }

    fn shift_op(&self, at: usize) -> ShiftOperation {
        match self {
            Dimension::Row => ShiftOperation::DeleteRow(at),
            Dimension::Column => ShiftOperation::DeleteColumn(at),
        }
    }

    fn out_of_bounds(&self) -> GridError {
        match self {
            Dimension::Row => GridError::RowOutOfBounds,
            Dimension::Column => GridError::ColumnOutOfBounds,
        }
    }

    fn last_remaining(&self) -> GridError {
        match self {
            Dimension::Row => GridError::LastRow,
            Dimension::Column => GridError::LastColumn,
        }
    }
}

fn non_empty(title: Option<&str>) -> Option<&str> {
    title.filter(|t| !t.is_empty())
}

impl Document {
    fn extent(&self, dim: Dimension) -> usize {
        match dim {
            Dimension::Row => self.rows,
            Dimension::Column => self.cols,
        }
    }

    fn headers_mut(&mut self, dim: Dimension) -> &mut Vec<String> {
        match dim {
            Dimension::Row => &mut self.row_headers,
            Dimension::Column => &mut self.column_headers,
        }
    }

    /// Set cell contents from input string.
    ///
    /// Existing edges are torn down; new ones are only derived by the next
    /// evaluation pass.
    pub fn set_cell_input(&mut self, cell_id: &str, input: &str) -> Result<()> {
        let coord = CellRef::from_id(cell_id)
            .filter(|c| self.grid.contains_key(c))
            .ok_or_else(|| GridError::CellNotFound(cell_id.to_string()))?;

        self.unlink_all(coord);
        if let Some(cell) = self.grid.get_mut(&coord) {
            cell.update_input(input);
        }
        tracing::trace!(cell = cell_id, "input updated");
        Ok(())
    }

    /// Append a row of empty cells. Fails past [`MAX_ROWS`].
    pub fn add_row(&mut self, title: Option<&str>) -> Result<()> {
        let at = self.rows;
        if at >= MAX_ROWS {
            return Err(GridError::TooManyRows);
        }
        for col in 0..self.cols {
            let coord = CellRef::new(at, col);
            self.grid.insert(coord, Cell::new_empty(coord));
        }
        self.row_headers
            .push(non_empty(title).map_or_else(|| default_row_header(at), String::from));
        self.rows += 1;
        tracing::debug!(row = at, "added row");
        Ok(())
    }

    /// Append a column of empty cells. Fails past column `Z`.
    pub fn add_column(&mut self, title: Option<&str>) -> Result<()> {
        let at = self.cols;
        if at >= MAX_COLS {
            return Err(GridError::TooManyColumns);
        }
        for row in 0..self.rows {
            let coord = CellRef::new(row, at);
            self.grid.insert(coord, Cell::new_empty(coord));
        }
        self.column_headers
            .push(non_empty(title).map_or_else(|| default_column_header(at), String::from));
        self.cols += 1;
        tracing::debug!(col = at, "added column");
        Ok(())
    }

    /// Generic delete operation for row or column
    fn delete_dimension(&mut self, dim: Dimension, at: usize) -> Result<()> {
        let extent = self.extent(dim);
        if at >= extent {
            return Err(dim.out_of_bounds());
        }
        if extent <= 1 {
            return Err(dim.last_remaining());
        }

        // Detach and drop the cells at the deleted coordinate
        let doomed: Vec<CellRef> = self
            .grid
            .keys()
            .filter(|c| dim.get_coord(c) == at)
            .copied()
            .collect();
        for coord in doomed {
            self.unlink_all(coord);
            self.grid.remove(&coord);
        }

        self.headers_mut(dim).remove(at);
        match dim {
            Dimension::Row => self.rows -= 1,
            Dimension::Column => self.cols -= 1,
        }

        // Move every later cell one step toward the gap, carrying its edges
        let op = dim.shift_op(at);
        let remap = |set: BTreeSet<CellRef>| -> BTreeSet<CellRef> {
            set.into_iter()
                .filter_map(|c| shift_single_ref(c, op))
                .collect()
        };
        let old_grid = std::mem::take(&mut self.grid);
        for (coord, mut cell) in old_grid {
            let Some(new_coord) = shift_single_ref(coord, op) else {
                continue;
            };
            cell.coord = new_coord;
            cell.dependencies = remap(std::mem::take(&mut cell.dependencies));
            cell.dependents = remap(std::mem::take(&mut cell.dependents));
            self.grid.insert(new_coord, cell);
        }

        // Rewrite ALL formulas for the shifted references
        for cell in self.grid.values_mut() {
            if !cell.is_formula() || cell.deleted_ref.is_some() {
                continue;
            }
            match shift_formula_references(&cell.input, op) {
                ShiftOutcome::Rewritten(formula) => {
                    if formula != cell.input {
                        cell.input = formula;
                        cell.state = Default::default();
                    }
                }
                ShiftOutcome::DeletedReference(id) => {
                    cell.set_error(format!("Reference to deleted cell: {}", id));
                    cell.deleted_ref = Some(id);
                }
            }
        }

        tracing::debug!(dimension = ?dim, index = at, "deleted");
        Ok(())
    }

    /// Delete the specified row
    pub fn delete_row(&mut self, at_row: usize) -> Result<()> {
        self.delete_dimension(Dimension::Row, at_row)
    }

    /// Delete the specified column
    pub fn delete_column(&mut self, at_col: usize) -> Result<()> {
        self.delete_dimension(Dimension::Column, at_col)
    }

    fn update_header(&mut self, dim: Dimension, index: usize, title: &str) -> Result<()> {
        let headers = self.headers_mut(dim);
        let slot = headers.get_mut(index).ok_or_else(|| dim.out_of_bounds())?;
        *slot = title.to_string();
        Ok(())
    }

    pub fn update_row_header(&mut self, index: usize, title: &str) -> Result<()> {
        self.update_header(Dimension::Row, index, title)
    }

    pub fn update_column_header(&mut self, index: usize, title: &str) -> Result<()> {
        self.update_header(Dimension::Column, index, title)
    }
}
