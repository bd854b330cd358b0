//! Circular dependency detection for formula cells.
//!
//! A formula that (directly or transitively) reads itself can never be
//! evaluated. Every cell on such a loop (e.g., A1 references B1, B1
//! references C1, C1 references A1) is reported, not just the edge that
//! closes it. Cycles are the strongly connected components of the
//! `dependencies` graph with more than one member, plus self-loops.
//!
//! The search is an iterative Tarjan walk so deep reference chains cannot
//! overflow the call stack.

use std::collections::{BTreeSet, HashMap};

use super::{CellRef, Grid};

struct Frame {
    cell: CellRef,
    neighbours: Vec<CellRef>,
    next_idx: usize,
}

#[derive(Default)]
struct Tarjan {
    index_counter: usize,
    indices: HashMap<CellRef, usize>,
    lowlinks: HashMap<CellRef, usize>,
    stack: Vec<CellRef>,
    on_stack: BTreeSet<CellRef>,
}

impl Tarjan {
    fn visit(&mut self, cell: CellRef, grid: &Grid, dfs: &mut Vec<Frame>) {
        let idx = self.index_counter;
        self.index_counter += 1;
        self.indices.insert(cell, idx);
        self.lowlinks.insert(cell, idx);
        self.stack.push(cell);
        self.on_stack.insert(cell);

        // Edges to cells that are not in the grid cannot close a loop.
        let neighbours = grid
            .get(&cell)
            .map(|c| {
                c.dependencies
                    .iter()
                    .filter(|dep| grid.contains_key(dep))
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        dfs.push(Frame {
            cell,
            neighbours,
            next_idx: 0,
        });
    }

    fn lower(&mut self, cell: CellRef, candidate: usize) {
        if let Some(low) = self.lowlinks.get_mut(&cell)
            && candidate < *low
        {
            *low = candidate;
        }
    }
}

/// Find every cell that participates in a dependency cycle.
pub fn find_cycle_members(grid: &Grid) -> BTreeSet<CellRef> {
    let mut state = Tarjan::default();
    let mut members = BTreeSet::new();

    for &root in grid.keys() {
        if state.indices.contains_key(&root) {
            continue;
        }

        let mut dfs: Vec<Frame> = Vec::new();
        state.visit(root, grid, &mut dfs);

        while let Some(frame) = dfs.last_mut() {
            if frame.next_idx < frame.neighbours.len() {
                let w = frame.neighbours[frame.next_idx];
                frame.next_idx += 1;
                let v = frame.cell;

                if let Some(&w_idx) = state.indices.get(&w) {
                    if state.on_stack.contains(&w) {
                        state.lower(v, w_idx);
                    }
                } else {
                    state.visit(w, grid, &mut dfs);
                }
                continue;
            }

            // All neighbours explored; pop and propagate lowlink.
            let Some(finished) = dfs.pop() else {
                break;
            };
            let v = finished.cell;
            let v_low = state.lowlinks[&v];

            if let Some(parent) = dfs.last() {
                state.lower(parent.cell, v_low);
            }

            if v_low != state.indices[&v] {
                continue;
            }

            let mut scc = Vec::new();
            while let Some(w) = state.stack.pop() {
                state.on_stack.remove(&w);
                scc.push(w);
                if w == v {
                    break;
                }
            }

            let self_loop = scc.len() == 1
                && grid
                    .get(&v)
                    .is_some_and(|c| c.dependencies.contains(&v));
            if scc.len() > 1 || self_loop {
                members.extend(scc);
            }
        }
    }

    members
}
