//! Cell reference parsing and formatting.
//!
//! Provides bidirectional conversion between spreadsheet-style cell ids
//! (e.g., "A1", "B2", "Z100") and zero-indexed row/column coordinates.
//! Only single-letter columns are addressable, so a grid never has more
//! than [`MAX_COLS`] columns.
//!
//! # Examples
//!
//! ```
//! use gridcalc_engine::engine::CellRef;
//!
//! let cell = CellRef::from_id("B3").unwrap();
//! assert_eq!(cell.col, 1); // 0-indexed
//! assert_eq!(cell.row, 2);
//! assert_eq!(cell.to_string(), "B3");
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Number of addressable columns (`A` through `Z`).
pub const MAX_COLS: usize = 26;

/// Largest row count a grid may have. Grids are dense, so this bounds memory.
pub const MAX_ROWS: usize = 65_536;

/// A reference to a cell by row and column indices (0-indexed).
///
/// Ordering is row-major, which is also the iteration order of [`super::Grid`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CellRef {
    pub row: usize,
    pub col: usize,
}

impl CellRef {
    pub fn new(row: usize, col: usize) -> CellRef {
        CellRef { row, col }
    }

    /// Format a coordinate as an id. Returns None for columns past `Z`.
    pub fn to_id(row: usize, col: usize) -> Option<String> {
        let letter = Self::col_to_letter(col)?;
        Some(format!("{}{}", letter, row.checked_add(1)?))
    }

    /// Parse an id such as "A1" or "Z12".
    ///
    /// Exactly one uppercase letter followed by a 1-based row number without
    /// a leading zero. Anything else (including row overflow) is None.
    pub fn from_id(id: &str) -> Option<CellRef> {
        let caps = id_re().captures(id)?;
        let col = (caps["col"].as_bytes()[0] - b'A') as usize;
        let row = caps["row"].parse::<usize>().ok()?.checked_sub(1)?;
        Some(CellRef::new(row, col))
    }

    /// Convert a column index to its letter (0 -> A, 25 -> Z).
    pub fn col_to_letter(col: usize) -> Option<char> {
        if col < MAX_COLS {
            Some((b'A' + col as u8) as char)
        } else {
            None
        }
    }

    /// True if this reference lies inside a `rows` x `cols` grid.
    pub fn in_bounds(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }
}

fn id_re() -> &'static Regex {
    static ID_RE: OnceLock<Regex> = OnceLock::new();
    ID_RE.get_or_init(|| {
        Regex::new(r"^(?<col>[A-Z])(?<row>[1-9][0-9]*)$").expect("cell id regex must compile")
    })
}

impl std::str::FromStr for CellRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_id(s).ok_or_else(|| format!("Invalid cell reference: {}", s))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Out-of-range columns only arise from arithmetic bugs; render them
        // visibly instead of panicking.
        match Self::col_to_letter(self.col) {
            Some(letter) => write!(f, "{}{}", letter, self.row + 1),
            None => write!(f, "#COL{}#{}", self.col, self.row + 1),
        }
    }
}
