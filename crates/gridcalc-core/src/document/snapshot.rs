//! Serializable views of a document and of an evaluation pass.

use super::Document;
use super::state::{default_column_header, default_row_header};
use crate::error::Result;
use gridcalc_engine::engine::{Cell, CellRef, CellValue};
use serde::{Deserialize, Serialize};

/// One cell as seen from outside the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    pub id: String,
    pub coordinate: CellRef,
    pub input: String,
    pub value: Option<CellValue>,
    pub error: Option<String>,
    pub is_formula: bool,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
}

impl From<&Cell> for CellSnapshot {
    fn from(cell: &Cell) -> Self {
        CellSnapshot {
            id: cell.id(),
            coordinate: cell.coord,
            input: cell.input.clone(),
            value: cell.value().cloned(),
            error: cell.error().map(String::from),
            is_formula: cell.is_formula(),
            dependencies: cell.dependencies.iter().map(CellRef::to_string).collect(),
            dependents: cell.dependents.iter().map(CellRef::to_string).collect(),
        }
    }
}

/// Full grid: row-major cell matrix, headers and dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSnapshot {
    pub cells: Vec<Vec<CellSnapshot>>,
    pub row_headers: Vec<String>,
    pub column_headers: Vec<String>,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellErrorReport {
    pub cell_id: String,
    pub error: String,
}

/// Outcome of [`Document::evaluate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub success: bool,
    pub grid: GridSnapshot,
    pub errors: Vec<CellErrorReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circular_references: Option<Vec<String>>,
}

impl Document {
    pub fn snapshot(&self) -> GridSnapshot {
        let cells = (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| {
                        let coord = CellRef::new(row, col);
                        self.grid
                            .get(&coord)
                            .map(CellSnapshot::from)
                            .unwrap_or_else(|| CellSnapshot::from(&Cell::new_empty(coord)))
                    })
                    .collect()
            })
            .collect();

        GridSnapshot {
            cells,
            row_headers: self.row_headers.clone(),
            column_headers: self.column_headers.clone(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Rebuild a document from a snapshot.
    ///
    /// Only each cell's `input` is re-applied; values, errors and edges are
    /// recomputed by the next evaluation. Missing header labels fall back
    /// to the defaults and cells outside the dimensions are ignored.
    pub fn from_snapshot(snapshot: &GridSnapshot) -> Result<Document> {
        let mut doc = Document::new(snapshot.rows, snapshot.cols)?;

        for (i, header) in doc.row_headers.iter_mut().enumerate() {
            *header = snapshot
                .row_headers
                .get(i)
                .cloned()
                .unwrap_or_else(|| default_row_header(i));
        }
        for (i, header) in doc.column_headers.iter_mut().enumerate() {
            *header = snapshot
                .column_headers
                .get(i)
                .cloned()
                .unwrap_or_else(|| default_column_header(i));
        }

        for cell in snapshot.cells.iter().flatten() {
            if cell.input.is_empty() {
                continue;
            }
            if doc.set_cell_input(&cell.id, &cell.input).is_err() {
                tracing::debug!(cell = %cell.id, "snapshot cell outside grid, skipped");
            }
        }

        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    #[test]
    fn test_snapshot_shape() {
        let mut doc = Document::new(2, 3).unwrap();
        doc.set_cell_input("A1", "2").unwrap();
        doc.set_cell_input("C2", "=A1*4").unwrap();
        doc.evaluate();

        let snap = doc.snapshot();
        assert_eq!((snap.rows, snap.cols), (2, 3));
        assert_eq!(snap.cells.len(), 2);
        assert!(snap.cells.iter().all(|row| row.len() == 3));

        let c2 = &snap.cells[1][2];
        assert_eq!(c2.id, "C2");
        assert_eq!(c2.coordinate, CellRef::new(1, 2));
        assert!(c2.is_formula);
        assert_eq!(c2.value, Some(CellValue::Number(8.0)));
        assert_eq!(c2.dependencies, ["A1"]);
        assert_eq!(snap.cells[0][0].dependents, ["C2"]);
    }

    #[test]
    fn test_snapshot_json_field_names() {
        let mut doc = Document::new(1, 2).unwrap();
        doc.set_cell_input("A1", "hi").unwrap();
        doc.set_cell_input("B1", "=A1").unwrap();
        let result = doc.evaluate();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["errors"][0]["cellId"], "B1");
        assert!(json.get("circularReferences").is_none());
        assert_eq!(json["grid"]["rowHeaders"][0], "1");
        assert_eq!(json["grid"]["columnHeaders"][1], "B");

        let a1 = &json["grid"]["cells"][0][0];
        assert_eq!(a1["value"], "hi");
        assert_eq!(a1["isFormula"], false);
        assert_eq!(a1["coordinate"]["row"], 0);
        let b1 = &json["grid"]["cells"][0][1];
        assert!(b1["value"].is_null());
        assert_eq!(b1["error"], "Cell A1 contains non-numeric value: hi");
    }

    #[test]
    fn test_from_snapshot_reapplies_inputs_only() {
        let mut doc = Document::new(3, 2).unwrap();
        doc.set_cell_input("A1", "5").unwrap();
        doc.set_cell_input("B3", "=A1+1").unwrap();
        doc.update_column_header(1, "Total").unwrap();
        doc.evaluate();

        let mut snap = doc.snapshot();
        snap.row_headers.truncate(1);
        snap.cells[0][1].value = Some(CellValue::Number(99.0));

        let mut restored = Document::from_snapshot(&snap).unwrap();
        assert_eq!(restored.column_headers(), ["A", "Total"]);
        assert_eq!(restored.row_headers(), ["1", "2", "3"]);
        assert!(restored.cell("B1").unwrap().value().is_none());
        assert!(restored.cell("B3").unwrap().is_pending());

        restored.evaluate();
        assert_eq!(restored.snapshot(), doc.snapshot());
    }

    #[test]
    fn test_from_snapshot_validates_dimensions() {
        let snap = GridSnapshot {
            cells: Vec::new(),
            row_headers: Vec::new(),
            column_headers: Vec::new(),
            rows: 0,
            cols: 2,
        };
        assert!(matches!(
            Document::from_snapshot(&snap),
            Err(GridError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_evaluation_result_json_round_trip() {
        let mut doc = Document::new(1, 2).unwrap();
        doc.set_cell_input("A1", "=B1").unwrap();
        doc.set_cell_input("B1", "=A1").unwrap();
        let result = doc.evaluate();

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"circularReferences\":[\"A1\",\"B1\"]"));
        let back: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
