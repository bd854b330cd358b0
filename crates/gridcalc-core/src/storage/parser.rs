//! Parser for .grd file format
//!
//! ```text
//! # comment
//! @size 4x3
//! @row 4: Total
//! @col B: Price
//! A1: 10
//! B4: =B1+B2+B3
//! C1: "  padded text"
//! ```
//!
//! Without `@size` the document is large enough for every listed cell and
//! never smaller than the default 5x3.

use crate::document::{DEFAULT_COLS, DEFAULT_ROWS, Document};
use crate::error::{GridError, Result};
use gridcalc_engine::engine::{CellRef, MAX_COLS, MAX_ROWS};
use std::fs;
use std::path::Path;

/// Parse a .grd file and return a Document
pub fn parse_grd(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path)?;
    parse_grd_content(&content)
}

enum Header {
    Row(usize),
    Column(usize),
}

fn parse_error(line: usize, message: impl Into<String>) -> GridError {
    GridError::Parse {
        line,
        message: message.into(),
    }
}

/// Parse .grd content from a string
pub fn parse_grd_content(content: &str) -> Result<Document> {
    let mut size: Option<(usize, usize)> = None;
    let mut headers: Vec<(usize, Header, String)> = Vec::new();
    let mut cells: Vec<(usize, CellRef, String)> = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(directive) = line.strip_prefix('@') {
            if let Some(dims) = directive.strip_prefix("size") {
                if size.is_some() {
                    return Err(parse_error(line_num, "Duplicate @size directive"));
                }
                size = Some(parse_size(dims.trim(), line_num)?);
            } else if let Some(rest) = directive.strip_prefix("row") {
                let (index, title) = split_entry(rest, line_num)?;
                let row = index
                    .parse::<usize>()
                    .ok()
                    .and_then(|r| r.checked_sub(1))
                    .ok_or_else(|| parse_error(line_num, format!("Invalid row number: {}", index)))?;
                headers.push((line_num, Header::Row(row), title));
            } else if let Some(rest) = directive.strip_prefix("col") {
                let (index, title) = split_entry(rest, line_num)?;
                let col = parse_column(index)
                    .ok_or_else(|| parse_error(line_num, format!("Invalid column: {}", index)))?;
                headers.push((line_num, Header::Column(col), title));
            } else {
                return Err(parse_error(line_num, format!("Unknown directive: @{}", directive)));
            }
            continue;
        }

        // Parse "CELLREF: INPUT" format
        let (cell_ref_str, input) = split_entry(line, line_num)?;
        let cell_ref = CellRef::from_id(cell_ref_str).ok_or_else(|| {
            parse_error(line_num, format!("Invalid cell reference: {}", cell_ref_str))
        })?;
        if cell_ref.row >= MAX_ROWS {
            return Err(parse_error(
                line_num,
                format!("Cell {} is past the last supported row {}", cell_ref, MAX_ROWS),
            ));
        }
        cells.push((line_num, cell_ref, input));
    }

    let (rows, cols) = size.unwrap_or_else(|| {
        cells.iter().fold((DEFAULT_ROWS, DEFAULT_COLS), |(r, c), (_, cr, _)| {
            (r.max(cr.row + 1), c.max(cr.col + 1))
        })
    });
    let mut doc = Document::new(rows, cols)?;

    for (line_num, header, title) in headers {
        let applied = match header {
            Header::Row(row) => doc.update_row_header(row, &title),
            Header::Column(col) => doc.update_column_header(col, &title),
        };
        applied.map_err(|e| parse_error(line_num, e.to_string()))?;
    }

    for (line_num, cell_ref, input) in cells {
        if !cell_ref.in_bounds(rows, cols) {
            return Err(parse_error(
                line_num,
                format!("Cell {} is outside the {}x{} grid", cell_ref, rows, cols),
            ));
        }
        doc.set_cell_input(&cell_ref.to_string(), &input)?;
    }

    Ok(doc)
}

/// Split "KEY: VALUE", decoding a quoted value.
fn split_entry(line: &str, line_num: usize) -> Result<(&str, String)> {
    let Some((key, value)) = line.split_once(':') else {
        return Err(parse_error(line_num, "Expected 'KEY: VALUE' format"));
    };
    Ok((key.trim(), parse_grd_text(value.trim())))
}

fn parse_size(dims: &str, line_num: usize) -> Result<(usize, usize)> {
    let parsed = dims
        .split_once(['x', 'X'])
        .and_then(|(r, c)| Some((r.trim().parse().ok()?, c.trim().parse().ok()?)));
    match parsed {
        Some((rows, cols)) if (1..=MAX_ROWS).contains(&rows) && (1..=MAX_COLS).contains(&cols) => {
            Ok((rows, cols))
        }
        _ => Err(parse_error(line_num, format!("Invalid size: {}", dims))),
    }
}

fn parse_column(label: &str) -> Option<usize> {
    let mut chars = label.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_uppercase() => Some((c as u8 - b'A') as usize),
        _ => None,
    }
}

/// A value wrapped in double quotes is unescaped; anything else is taken verbatim.
fn parse_grd_text(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        unescape_grd_text(&value[1..value.len() - 1])
    } else {
        value.to_string()
    }
}

fn unescape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                match next {
                    '\\' => out.push('\\'),
                    '"' => out.push('"'),
                    'n' => out.push('\n'),
                    'r' => out.push('\r'),
                    _ => {
                        out.push('\\');
                        out.push(next);
                    }
                }
            } else {
                out.push('\\');
            }
        } else {
            out.push(ch);
        }
    }
    out
}
