//! gridcalc-core - UI-agnostic grid model, evaluation pass and storage.

pub mod document;
pub mod error;
pub mod service;
pub mod storage;

pub use document::{
    CellErrorReport, CellSnapshot, DEFAULT_COLS, DEFAULT_ROWS, Document, EvaluationResult,
    GridSnapshot,
};
pub use error::{GridError, Result};
pub use service::{
    CellDetailResponse, GridReply, GridRequest, GridResponse, GridService, ValidationResult,
};

pub use gridcalc_engine::engine::{CellRef, CellValue};
