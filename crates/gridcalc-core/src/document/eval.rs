//! The evaluation pass.
//!
//! Each pass rebuilds the dependency graph from the current inputs, marks
//! every cycle member, then evaluates the remaining cells in topological
//! order with an explicit worklist (in-degree counting), so deep reference
//! chains never recurse.

use super::{CellErrorReport, Document, EvaluationResult};
use gridcalc_engine::engine::{
    CellRef, CellState, CellValue, evaluate_expression, evaluate_literal, extract_references,
    find_cycle_members, substitute_references, validate_syntax,
};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

pub(crate) const CIRCULAR_REFERENCE: &str = "Circular reference detected";

impl Document {
    /// Run a full evaluation pass and report every errored cell.
    ///
    /// The pass always completes; per-cell failures are recorded on the
    /// cells, never returned as `Err`.
    pub fn evaluate(&mut self) -> EvaluationResult {
        let span = tracing::info_span!("evaluate", cells = self.grid.len());
        let _enter = span.enter();

        self.reset_pass();
        self.build_edges();

        let circular = find_cycle_members(&self.grid);
        for coord in &circular {
            if let Some(cell) = self.grid.get_mut(coord) {
                cell.set_error(CIRCULAR_REFERENCE);
            }
        }
        if !circular.is_empty() {
            tracing::debug!(
                cells = ?circular.iter().map(CellRef::to_string).collect::<Vec<_>>(),
                "circular references"
            );
        }

        for coord in self.topological_order(&circular) {
            self.evaluate_cell(coord);
        }

        // Anything still pending could not be ordered; only a cycle does that.
        let stranded: Vec<CellRef> = self
            .grid
            .values()
            .filter(|c| c.is_pending())
            .map(|c| c.coord)
            .collect();
        for coord in stranded {
            tracing::warn!(cell = %coord, "cell left unevaluated");
            if let Some(cell) = self.grid.get_mut(&coord) {
                cell.set_error(CIRCULAR_REFERENCE);
            }
        }

        self.collect_result(&circular)
    }

    /// Cells holding a `deleted_ref` keep reporting it; only a new input clears it.
    fn reset_pass(&mut self) {
        for cell in self.grid.values_mut() {
            cell.state = CellState::Pending;
            cell.dependencies.clear();
            cell.dependents.clear();
        }
    }

    fn build_edges(&mut self) {
        let mut edges = Vec::new();
        for cell in self.grid.values() {
            if !cell.is_formula() || cell.deleted_ref.is_some() {
                continue;
            }
            for id in extract_references(&cell.input) {
                // Out-of-bounds ids have no node; evaluation reports them.
                if let Some(dep) = CellRef::from_id(&id).filter(|d| self.grid.contains_key(d)) {
                    edges.push((cell.coord, dep));
                }
            }
        }
        for (from, to) in edges {
            self.link(from, to);
        }
    }

    /// Kahn's algorithm over the non-circular cells. Ready cells are taken
    /// in row-major order.
    fn topological_order(&self, circular: &BTreeSet<CellRef>) -> Vec<CellRef> {
        let mut pending: BTreeMap<CellRef, usize> = BTreeMap::new();
        for (coord, cell) in &self.grid {
            if circular.contains(coord) {
                continue;
            }
            let count = cell
                .dependencies
                .iter()
                .filter(|d| !circular.contains(d))
                .count();
            pending.insert(*coord, count);
        }

        let mut ready: VecDeque<CellRef> = pending
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(coord, _)| *coord)
            .collect();
        let mut order = Vec::with_capacity(pending.len());

        while let Some(coord) = ready.pop_front() {
            order.push(coord);
            let Some(cell) = self.grid.get(&coord) else {
                continue;
            };
            for dependent in &cell.dependents {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push_back(*dependent);
                    }
                }
            }
        }

        order
    }

    fn evaluate_cell(&mut self, coord: CellRef) {
        let Some(cell) = self.grid.get(&coord) else {
            return;
        };
        if !cell.is_pending() {
            return;
        }

        let state = if let Some(id) = &cell.deleted_ref {
            CellState::Error(format!("Reference to deleted cell: {}", id))
        } else if cell.is_formula() {
            match self.evaluate_formula(&cell.input) {
                Ok(n) => CellState::Value(CellValue::Number(n)),
                Err(e) => CellState::Error(e),
            }
        } else {
            CellState::Value(evaluate_literal(&cell.input))
        };

        tracing::trace!(cell = %coord, state = ?state, "evaluated");
        if let Some(cell) = self.grid.get_mut(&coord) {
            cell.state = state;
        }
    }

    /// Evaluate a formula against the current cell values without storing
    /// it anywhere. During a pass every dependency has been evaluated first;
    /// outside a pass, call [`Document::evaluate`] beforehand.
    ///
    /// Dependencies are resolved before the syntax is checked, so a failed
    /// dependency is reported ahead of a malformed expression.
    pub fn evaluate_formula(&self, formula: &str) -> Result<f64, String> {
        let mut values: HashMap<String, f64> = HashMap::new();
        for id in extract_references(formula) {
            let coord = CellRef::from_id(&id)
                .filter(|c| c.in_bounds(self.rows, self.cols))
                .ok_or_else(|| format!("Reference {} is out of bounds", id))?;
            let dep = self
                .grid
                .get(&coord)
                .ok_or_else(|| format!("Dependency {} not found", id))?;

            match &dep.state {
                CellState::Error(e) => return Err(format!("Dependency {} has error: {}", id, e)),
                CellState::Pending => {
                    return Err(format!("Dependency {} has not been evaluated", id));
                }
                CellState::Value(CellValue::Number(n)) => {
                    values.insert(id, *n);
                }
                CellState::Value(CellValue::Text(t)) if t.trim().is_empty() => {
                    return Err(format!("Cell {} is empty", id));
                }
                CellState::Value(CellValue::Text(t)) => {
                    return Err(format!("Cell {} contains non-numeric value: {}", id, t));
                }
            }
        }

        validate_syntax(formula).map_err(|e| e.to_string())?;
        let expr = substitute_references(formula, |id| values.get(id).copied())
            .map_err(|id| format!("Dependency {} not found", id))?;
        evaluate_expression(&expr).map_err(|e| e.to_string())
    }

    fn collect_result(&self, circular: &BTreeSet<CellRef>) -> EvaluationResult {
        let report = |coord: &CellRef, error: &str| CellErrorReport {
            cell_id: coord.to_string(),
            error: error.to_string(),
        };

        let mut errors: Vec<CellErrorReport> = circular
            .iter()
            .filter_map(|c| self.grid.get(c).and_then(|cell| cell.error()).map(|e| report(c, e)))
            .collect();
        errors.extend(
            self.grid
                .iter()
                .filter(|(coord, _)| !circular.contains(coord))
                .filter_map(|(coord, cell)| cell.error().map(|e| report(coord, e))),
        );

        let circular_references = (!circular.is_empty())
            .then(|| circular.iter().map(CellRef::to_string).collect());

        EvaluationResult {
            success: errors.is_empty(),
            grid: self.snapshot(),
            errors,
            circular_references,
        }
    }
}
