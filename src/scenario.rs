//! Scenario line model: parse the 9-field MovingAI agent record and format
//! the waypoint-augmented output line.
//!
//! Anything that is not a 9-field agent record (version headers, blanks,
//! malformed lines) is carried through to every output verbatim rather
//! than dropped.

use crate::grid::Cell;

/// One line of a scenario file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Agent(AgentLine),
    Passthrough(String),
}

/// A parsed 9-field agent record: bucket, map name, width, height,
/// start x/y, goal x/y, optimal length. Coordinates are kept both as raw
/// fields (for verbatim re-emission of untouched values) and as cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentLine {
    fields: Vec<String>,
    start: Cell,
    goal: Cell,
}

const FIELD_COUNT: usize = 9;
const START_X: usize = 4;
const START_Y: usize = 5;
const GOAL_X: usize = 6;
const GOAL_Y: usize = 7;

impl AgentLine {
    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn set_start(&mut self, cell: Cell) {
        self.start = cell;
        self.fields[START_X] = cell.x.to_string();
        self.fields[START_Y] = cell.y.to_string();
    }

    pub fn set_goal(&mut self, cell: Cell) {
        self.goal = cell;
        self.fields[GOAL_X] = cell.x.to_string();
        self.fields[GOAL_Y] = cell.y.to_string();
    }

    /// Render the original fields plus the waypoint count and `(x, y)`
    /// coordinate pairs in sequence order, tab-joined.
    pub fn format_augmented(&self, waypoints: &[Cell]) -> String {
        let mut fields = self.fields.clone();
        fields.push(waypoints.len().to_string());
        for waypoint in waypoints {
            fields.push(waypoint.x.to_string());
            fields.push(waypoint.y.to_string());
        }
        fields.join("\t")
    }
}

/// Classify one raw scenario line.
///
/// A line is an agent record when it splits into exactly 9 fields and the
/// four coordinate fields parse as integers; everything else is
/// passthrough.
pub fn parse_line(raw: &str) -> Line {
    let fields = split_fields(raw);
    if fields.len() != FIELD_COUNT {
        return Line::Passthrough(raw.to_string());
    }

    let coords: Option<Vec<i32>> = fields[START_X..=GOAL_Y]
        .iter()
        .map(|field| field.parse::<i32>().ok())
        .collect();
    match coords {
        Some(coords) => Line::Agent(AgentLine {
            fields,
            start: Cell::new(coords[0], coords[1]),
            goal: Cell::new(coords[2], coords[3]),
        }),
        None => Line::Passthrough(raw.to_string()),
    }
}

/// Scenario files are nominally tab-delimited; some tools emit spaces.
fn split_fields(raw: &str) -> Vec<String> {
    if raw.contains('\t') {
        raw.split('\t').map(str::to_string).collect()
    } else {
        raw.split_whitespace().map(str::to_string).collect()
    }
}
