use super::Document;
use crate::error::Result;
use crate::storage::{parse_grd, write_grd, write_markdown};
use std::path::Path;

impl Document {
    /// Load a document from a .grd file. Nothing is evaluated yet.
    pub fn load_grd(path: &Path) -> Result<Document> {
        let doc = parse_grd(path)?;
        tracing::debug!(path = %path.display(), rows = doc.rows, cols = doc.cols, "loaded");
        Ok(doc)
    }

    /// Save the document's inputs and headers.
    pub fn save_grd(&self, path: &Path) -> Result<()> {
        write_grd(path, self)?;
        tracing::debug!(path = %path.display(), "saved");
        Ok(())
    }

    /// Write the current values as a markdown table.
    pub fn export_markdown(&self, path: &Path) -> Result<()> {
        write_markdown(path, self)?;
        Ok(())
    }
}
