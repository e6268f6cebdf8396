//! Grid map parsing and passability lookup.
//!
//! The on-disk format is the MovingAI benchmark layout: a four-line header
//! (`type`, `height H`, `width W`, `map`) followed by `H` rows of `W`
//! characters. `.` is passable; every other character is an obstacle.

use crate::error::MapError;

/// A grid coordinate. `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Immutable passability table plus the row-major free-cell list.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    passable: Vec<bool>,
    free_cells: Vec<Cell>,
}

impl Grid {
    /// Parse map text, failing when declared dimensions disagree with the
    /// actual row/column counts. Callers treat a failure as map-fatal and
    /// skip every scenario referencing the map.
    pub fn parse(text: &str) -> Result<Grid, MapError> {
        let lines: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        if lines.len() < 4 {
            return Err(MapError::Malformed {
                reason: format!("expected 4 header lines, found {}", lines.len()),
            });
        }

        let height = parse_header_field(lines[1], "height")?;
        let width = parse_header_field(lines[2], "width")?;
        if height <= 0 || width <= 0 {
            return Err(MapError::Malformed {
                reason: format!("non-positive dimensions {width}x{height}"),
            });
        }
        if lines[3].trim() != "map" {
            return Err(MapError::Malformed {
                reason: format!("expected 'map' marker on line 4, found '{}'", lines[3]),
            });
        }

        let rows: Vec<&str> = lines[4..]
            .iter()
            .copied()
            .filter(|row| !row.trim().is_empty())
            .collect();
        if rows.len() != height as usize {
            return Err(MapError::Malformed {
                reason: format!("declared height {height} but found {} grid rows", rows.len()),
            });
        }

        let mut passable = Vec::with_capacity((width * height) as usize);
        let mut free_cells = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != width as usize {
                return Err(MapError::Malformed {
                    reason: format!(
                        "declared width {width} but row {y} has {} columns",
                        chars.len()
                    ),
                });
            }
            for (x, ch) in chars.iter().enumerate() {
                let free = *ch == '.';
                passable.push(free);
                if free {
                    free_cells.push(Cell::new(x as i32, y as i32));
                }
            }
        }

        Ok(Grid {
            width,
            height,
            passable,
            free_cells,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Free cells in row-major scan order.
    pub fn free_cells(&self) -> &[Cell] {
        &self.free_cells
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// True when `cell` is in bounds and passable.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && self.passable[(cell.y * self.width + cell.x) as usize]
    }
}

fn parse_header_field(line: &str, name: &str) -> Result<i32, MapError> {
    let mut parts = line.split_whitespace();
    let label = parts.next().unwrap_or("");
    let value = parts.next().unwrap_or("");
    if label != name {
        return Err(MapError::Malformed {
            reason: format!("expected '{name} <value>' header line, found '{line}'"),
        });
    }
    value.parse::<i32>().map_err(|_| MapError::Malformed {
        reason: format!("invalid {name} value '{value}'"),
    })
}
