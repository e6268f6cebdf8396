//! Per-map record of waypoint cells already assigned to some agent.

use crate::grid::Cell;
use std::collections::HashSet;

/// Insert-only set of committed waypoint cells.
///
/// Scoped to one map's processing run and shared across every scenario
/// file of that map; never spans maps. Agents observe each other's
/// commitments in file order then line order, which is what makes the
/// uniqueness guarantee deterministic.
#[derive(Debug, Default)]
pub struct UniquenessRegistry {
    cells: HashSet<Cell>,
}

impl UniquenessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Record a cell; returns false if it was already committed.
    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
