use crate::error::{GridError, Result};
use gridcalc_engine::engine::{Cell, CellRef, Grid, MAX_COLS, MAX_ROWS};

/// Rows in a freshly created document.
pub const DEFAULT_ROWS: usize = 5;
/// Columns in a freshly created document.
pub const DEFAULT_COLS: usize = 3;

/// UI-agnostic document state: the owning grid aggregate.
///
/// Every coordinate inside `rows` x `cols` holds exactly one [`Cell`].
/// Dependency edges live on the cells themselves and are only ever changed
/// in pairs through [`Document::link`] and [`Document::unlink_all`], so
/// `b ∈ a.dependencies` iff `a ∈ b.dependents`.
#[derive(Clone, Debug)]
pub struct Document {
    pub(crate) grid: Grid,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) row_headers: Vec<String>,
    pub(crate) column_headers: Vec<String>,
}

impl Document {
    /// Create a document with every cell empty and default headers.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || rows > MAX_ROWS || cols == 0 || cols > MAX_COLS {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Self::build(rows, cols))
    }

    fn build(rows: usize, cols: usize) -> Self {
        let mut grid = Grid::new();
        for row in 0..rows {
            for col in 0..cols {
                let coord = CellRef::new(row, col);
                grid.insert(coord, Cell::new_empty(coord));
            }
        }

        Document {
            grid,
            rows,
            cols,
            row_headers: (0..rows).map(default_row_header).collect(),
            column_headers: (0..cols).map(default_column_header).collect(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_headers(&self) -> &[String] {
        &self.row_headers
    }

    pub fn column_headers(&self) -> &[String] {
        &self.column_headers
    }

    /// Look up a cell by id ("B3"). Malformed ids are simply not found.
    pub fn cell(&self, id: &str) -> Option<&Cell> {
        CellRef::from_id(id).and_then(|coord| self.grid.get(&coord))
    }

    pub fn cell_at(&self, coord: CellRef) -> Option<&Cell> {
        self.grid.get(&coord)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.grid.values()
    }

    /// Record that `from` reads `to`. Both directions are updated.
    pub(crate) fn link(&mut self, from: CellRef, to: CellRef) {
        if !self.grid.contains_key(&from) || !self.grid.contains_key(&to) {
            return;
        }
        if let Some(cell) = self.grid.get_mut(&from) {
            cell.dependencies.insert(to);
        }
        if let Some(cell) = self.grid.get_mut(&to) {
            cell.dependents.insert(from);
        }
    }

    /// Tear down every edge touching `coord`, on both ends.
    pub(crate) fn unlink_all(&mut self, coord: CellRef) {
        let Some(cell) = self.grid.get_mut(&coord) else {
            return;
        };
        let dependencies = std::mem::take(&mut cell.dependencies);
        let dependents = std::mem::take(&mut cell.dependents);

        for dep in dependencies {
            if let Some(other) = self.grid.get_mut(&dep) {
                other.dependents.remove(&coord);
            }
        }
        for dep in dependents {
            if let Some(other) = self.grid.get_mut(&dep) {
                other.dependencies.remove(&coord);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::build(DEFAULT_ROWS, DEFAULT_COLS)
    }
}

pub(crate) fn default_row_header(index: usize) -> String {
    (index + 1).to_string()
}

pub(crate) fn default_column_header(index: usize) -> String {
    CellRef::col_to_letter(index)
        .map(String::from)
        .unwrap_or_else(|| (index + 1).to_string())
}
