//! gridcalc_engine - Spreadsheet engine primitives.

pub mod engine;
