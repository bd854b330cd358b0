//! Markdown export functionality

use crate::document::Document;
use gridcalc_engine::engine::{CellState, format_value};
use std::path::Path;

/// Write the document to a markdown file
pub fn write_markdown(path: &Path, doc: &Document) -> std::io::Result<()> {
    std::fs::write(path, markdown_content(doc))
}

/// Render the document as a markdown table, using header labels for the
/// first row and column. Call after evaluating: unevaluated cells show
/// their raw input.
pub fn markdown_content(doc: &Document) -> String {
    let mut out = String::new();

    out.push_str("|   |");
    for title in doc.column_headers() {
        out.push_str(&format!(" {} |", escape_markdown(title)));
    }
    out.push('\n');

    out.push_str("|---|");
    for _ in doc.column_headers() {
        out.push_str("---|");
    }
    out.push('\n');

    let mut cells = doc.cells().peekable();
    for (row, title) in doc.row_headers().iter().enumerate() {
        out.push_str(&format!("| {} |", escape_markdown(title)));
        while let Some(cell) = cells.next_if(|c| c.coord.row == row) {
            let display = match &cell.state {
                CellState::Value(v) => format_value(v),
                CellState::Error(e) => format!("#ERR: {}", e),
                CellState::Pending => cell.input.clone(),
            };
            out.push_str(&format!(" {} |", escape_markdown(&display)));
        }
        out.push('\n');
    }

    out
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}
