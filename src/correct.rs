//! Correction of invalid agent positions onto the nearest free cell.
//!
//! Benchmark scenario files occasionally carry out-of-bounds or on-obstacle
//! coordinates. Correction is two-step: clamp into bounds, then if the
//! clamped cell is blocked walk outward ring by ring in Manhattan distance.
//! Within a ring, candidates are visited by increasing x then increasing y,
//! so the result is a pure function of the grid and the input cell.

use crate::error::MapError;
use crate::grid::{Cell, Grid};

/// Why a position had to be corrected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FixReason {
    OutOfBounds,
    Blocked,
}

/// Outcome of a position fix. `reason` is `None` when the input was
/// already valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Correction {
    pub original: Cell,
    pub fixed: Cell,
    pub reason: Option<FixReason>,
}

impl Correction {
    pub fn changed(&self) -> bool {
        self.reason.is_some()
    }
}

/// Map `cell` onto the nearest valid free cell.
///
/// Fails with [`MapError::NoFreeCells`] only when the grid has no free cell
/// anywhere, which callers treat as map-fatal.
pub fn fix(grid: &Grid, cell: Cell) -> Result<Correction, MapError> {
    let clamped = Cell::new(
        cell.x.clamp(0, grid.width() - 1),
        cell.y.clamp(0, grid.height() - 1),
    );
    let out_of_bounds = clamped != cell;

    if grid.is_free(clamped) {
        return Ok(Correction {
            original: cell,
            fixed: clamped,
            reason: out_of_bounds.then_some(FixReason::OutOfBounds),
        });
    }

    let reason = if out_of_bounds {
        FixReason::OutOfBounds
    } else {
        FixReason::Blocked
    };

    // Any free cell lies within width+height rings of any in-bounds cell.
    let max_distance = grid.width() + grid.height();
    for distance in 1..=max_distance {
        if let Some(found) = nearest_in_ring(grid, clamped, distance) {
            return Ok(Correction {
                original: cell,
                fixed: found,
                reason: Some(reason),
            });
        }
    }

    Err(MapError::NoFreeCells)
}

/// First free cell at exactly `distance` Manhattan steps from `center`,
/// scanning by increasing x then increasing y.
fn nearest_in_ring(grid: &Grid, center: Cell, distance: i32) -> Option<Cell> {
    for x in (center.x - distance)..=(center.x + distance) {
        let remainder = distance - (x - center.x).abs();
        for y in [center.y - remainder, center.y + remainder] {
            let candidate = Cell::new(x, y);
            if grid.is_free(candidate) {
                return Some(candidate);
            }
            if remainder == 0 {
                break;
            }
        }
    }
    None
}
