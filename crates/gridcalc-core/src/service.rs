//! Request-level facade over a single [`Document`].
//!
//! Every operation runs to completion on `&mut self`, so one service is one
//! critical section. Failures come back as `success: false` responses
//! carrying the error text rather than as `Err`.

use crate::document::{CellSnapshot, Document, EvaluationResult, GridSnapshot};
use crate::error::Result;
use gridcalc_engine::engine::{extract_references, validate_syntax};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridSnapshot>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDetailResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
}

/// One operation, as read from a JSON request stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GridRequest {
    GetGrid,
    UpdateCell { cell_id: String, input: String },
    GetCell { cell_id: String },
    Evaluate,
    AddRow {
        #[serde(default)]
        title: Option<String>,
    },
    AddColumn {
        #[serde(default)]
        title: Option<String>,
    },
    DeleteRow { index: usize },
    DeleteColumn { index: usize },
    UpdateRowHeader { index: usize, title: String },
    UpdateColumnHeader { index: usize, title: String },
    Reset { rows: usize, cols: usize },
    Validate { formula: String },
    Load { grid: GridSnapshot },
}

/// Reply to a [`GridRequest`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GridReply {
    Grid(GridResponse),
    Cell(CellDetailResponse),
    Evaluation(EvaluationResult),
    Validation(ValidationResult),
}

#[derive(Debug, Default)]
pub struct GridService {
    document: Document,
}

impl GridService {
    pub fn new(document: Document) -> Self {
        GridService { document }
    }

    pub fn with_size(rows: usize, cols: usize) -> Result<Self> {
        Ok(Self::new(Document::new(rows, cols)?))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    fn respond(&self, outcome: Result<()>) -> GridResponse {
        match outcome {
            Ok(()) => GridResponse {
                success: true,
                error: None,
                grid: Some(self.document.snapshot()),
            },
            Err(e) => {
                tracing::debug!(error = %e, "operation rejected");
                GridResponse {
                    success: false,
                    error: Some(e.to_string()),
                    grid: None,
                }
            }
        }
    }

    pub fn get_grid(&self) -> GridSnapshot {
        self.document.snapshot()
    }

    pub fn update_cell(&mut self, cell_id: &str, input: &str) -> GridResponse {
        let outcome = self.document.set_cell_input(cell_id, input);
        self.respond(outcome)
    }

    pub fn get_cell_details(&self, cell_id: &str) -> CellDetailResponse {
        match self.document.cell(cell_id) {
            Some(cell) => CellDetailResponse {
                success: true,
                cell: Some(CellSnapshot::from(cell)),
                error: None,
            },
            None => CellDetailResponse {
                success: false,
                cell: None,
                error: Some(format!("Cell {} not found", cell_id)),
            },
        }
    }

    pub fn evaluate_grid(&mut self) -> EvaluationResult {
        self.document.evaluate()
    }

    pub fn add_row(&mut self, title: Option<&str>) -> GridResponse {
        let outcome = self.document.add_row(title);
        self.respond(outcome)
    }

    pub fn add_column(&mut self, title: Option<&str>) -> GridResponse {
        let outcome = self.document.add_column(title);
        self.respond(outcome)
    }

    pub fn delete_row(&mut self, index: usize) -> GridResponse {
        let outcome = self.document.delete_row(index);
        self.respond(outcome)
    }

    pub fn delete_column(&mut self, index: usize) -> GridResponse {
        let outcome = self.document.delete_column(index);
        self.respond(outcome)
    }

    pub fn update_row_header(&mut self, index: usize, title: &str) -> GridResponse {
        let outcome = self.document.update_row_header(index, title);
        self.respond(outcome)
    }

    pub fn update_column_header(&mut self, index: usize, title: &str) -> GridResponse {
        let outcome = self.document.update_column_header(index, title);
        self.respond(outcome)
    }

    /// Replace the document with a fresh empty one. Invalid dimensions
    /// leave the current document in place.
    pub fn reset_grid(&mut self, rows: usize, cols: usize) -> GridResponse {
        let outcome = Document::new(rows, cols).map(|doc| self.document = doc);
        self.respond(outcome)
    }

    /// Check a formula without touching the document.
    pub fn validate_formula(&self, formula: &str) -> ValidationResult {
        match validate_syntax(formula) {
            Ok(()) => ValidationResult {
                is_valid: true,
                error: None,
                dependencies: Some(extract_references(formula)),
            },
            Err(e) => ValidationResult {
                is_valid: false,
                error: Some(e.to_string()),
                dependencies: None,
            },
        }
    }

    pub fn load_grid(&mut self, snapshot: &GridSnapshot) -> GridResponse {
        let outcome = Document::from_snapshot(snapshot).map(|doc| self.document = doc);
        self.respond(outcome)
    }

    /// Dispatch one request.
    pub fn handle(&mut self, request: GridRequest) -> GridReply {
        match request {
            GridRequest::GetGrid => GridReply::Grid(self.respond(Ok(()))),
            GridRequest::UpdateCell { cell_id, input } => {
                GridReply::Grid(self.update_cell(&cell_id, &input))
            }
            GridRequest::GetCell { cell_id } => GridReply::Cell(self.get_cell_details(&cell_id)),
            GridRequest::Evaluate => GridReply::Evaluation(self.evaluate_grid()),
            GridRequest::AddRow { title } => GridReply::Grid(self.add_row(title.as_deref())),
            GridRequest::AddColumn { title } => GridReply::Grid(self.add_column(title.as_deref())),
            GridRequest::DeleteRow { index } => GridReply::Grid(self.delete_row(index)),
            GridRequest::DeleteColumn { index } => GridReply::Grid(self.delete_column(index)),
            GridRequest::UpdateRowHeader { index, title } => {
                GridReply::Grid(self.update_row_header(index, &title))
            }
            GridRequest::UpdateColumnHeader { index, title } => {
                GridReply::Grid(self.update_column_header(index, &title))
            }
            GridRequest::Reset { rows, cols } => GridReply::Grid(self.reset_grid(rows, cols)),
            GridRequest::Validate { formula } => {
                GridReply::Validation(self.validate_formula(&formula))
            }
            GridRequest::Load { grid } => GridReply::Grid(self.load_grid(&grid)),
        }
    }
}
