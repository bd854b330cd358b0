//! Writer for .grd file format

use crate::document::{DEFAULT_COLS, DEFAULT_ROWS, Document};
use crate::error::Result;
use gridcalc_engine::engine::CellRef;
use std::fs;
use std::path::Path;

/// Write a Document to a .grd file
pub fn write_grd(path: &Path, doc: &Document) -> Result<()> {
    let content = write_grd_content(doc);
    fs::write(path, content)?;
    Ok(())
}

/// Write a Document to a .grd format string.
///
/// Only inputs are stored. Default headers and empty cells are skipped.
pub fn write_grd_content(doc: &Document) -> String {
    let mut lines = vec!["# Gridcalc Spreadsheet".to_string()];

    if (doc.rows(), doc.cols()) != (DEFAULT_ROWS, DEFAULT_COLS) {
        lines.push(format!("@size {}x{}", doc.rows(), doc.cols()));
    }

    for (i, title) in doc.row_headers().iter().enumerate() {
        if *title != (i + 1).to_string() {
            lines.push(format!("@row {}: {}", i + 1, format_grd_text(title)));
        }
    }
    for (i, title) in doc.column_headers().iter().enumerate() {
        let Some(letter) = CellRef::col_to_letter(i) else {
            continue;
        };
        if *title != letter.to_string() {
            lines.push(format!("@col {}: {}", letter, format_grd_text(title)));
        }
    }

    // Cells iterate in row-major order
    for cell in doc.cells() {
        if cell.input.is_empty() {
            continue;
        }
        lines.push(format!("{}: {}", cell.id(), format_grd_text(&cell.input)));
    }

    lines.join("\n") + "\n"
}

/// Quote text that would not survive the line format verbatim.
fn format_grd_text(text: &str) -> String {
    let needs_quotes = text.is_empty()
        || text.trim() != text
        || text.starts_with('"')
        || text.contains(['\n', '\r']);
    if needs_quotes {
        format!("\"{}\"", escape_grd_text(text))
    } else {
        text.to_string()
    }
}

fn escape_grd_text(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(ch),
        }
    }
    out
}
