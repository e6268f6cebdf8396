//! Reachability over 4-directional movement.

use crate::grid::{Cell, Grid};
use std::collections::{HashSet, VecDeque};

const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Breadth-first set of cells reachable from `start`.
///
/// Returns the empty set when `start` is out of bounds or blocked; callers
/// treat that as a zero-reachability condition and degrade the agent to an
/// empty waypoint list.
pub fn reachable(grid: &Grid, start: Cell) -> HashSet<Cell> {
    let mut visited = HashSet::new();
    if !grid.is_free(start) {
        return visited;
    }

    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        for (dx, dy) in DIRECTIONS {
            let next = Cell::new(cell.x + dx, cell.y + dy);
            if grid.is_free(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    visited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn grid(rows: &[&str]) -> Grid {
        let mut text = format!(
            "type octile\nheight {}\nwidth {}\nmap\n",
            rows.len(),
            rows[0].len()
        );
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        Grid::parse(&text).expect("parse map")
    }

    #[test]
    fn open_grid_is_fully_reachable() {
        let grid = grid(&["...", "...", "..."]);
        let set = reachable(&grid, Cell::new(0, 0));
        assert_eq!(set.len(), 9);
    }

    #[test]
    fn walls_partition_the_grid() {
        // Right column is cut off by a vertical wall.
        let grid = grid(&[".@.", ".@.", ".@."]);
        let set = reachable(&grid, Cell::new(0, 0));
        assert_eq!(set.len(), 3);
        assert!(set.contains(&Cell::new(0, 2)));
        assert!(!set.contains(&Cell::new(2, 0)));
    }

    #[test]
    fn diagonal_moves_are_not_allowed() {
        let grid = grid(&[".@", "@."]);
        let set = reachable(&grid, Cell::new(0, 0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn blocked_start_yields_empty_set() {
        let grid = grid(&[".@", ".."]);
        assert!(reachable(&grid, Cell::new(1, 0)).is_empty());
        assert!(reachable(&grid, Cell::new(5, 5)).is_empty());
    }
}
