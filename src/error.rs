//! Error types for map loading and position correction.
//!
//! Map-fatal conditions get their own enum so the workflow can skip every
//! scenario referencing a bad map without aborting the run; everything
//! agent- or line-local is absorbed where it happens and only logged.

use std::error::Error;
use std::fmt;

/// Map-fatal errors. Either the map text is unusable or the grid cannot
/// host a single waypoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapError {
    /// Declared dimensions disagree with the actual rows/columns, or the
    /// header is missing/garbled.
    Malformed {
        /// Human-readable description of the mismatch.
        reason: String,
    },
    /// The grid contains no free cell at all.
    NoFreeCells,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { reason } => write!(f, "malformed map: {reason}"),
            Self::NoFreeCells => write!(f, "map has no free cells"),
        }
    }
}

impl Error for MapError {}
