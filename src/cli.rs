//! CLI argument parsing for the waypoint generator.
//!
//! The CLI is intentionally thin: it names directories and knobs and
//! leaves every decision to the workflow, so the same core logic stays
//! testable without a process boundary.

use clap::Parser;
use std::path::PathBuf;

/// Waypoint counts produced in the default multi-count mode.
pub const DEFAULT_COUNTS: [usize; 5] = [0, 1, 2, 4, 8];

/// Command-line surface for `wpgen`.
#[derive(Parser, Debug)]
#[command(
    name = "wpgen",
    version,
    about = "Generate waypoint-augmented MAPF scenario files",
    after_help = "Examples:\n  wpgen --maps ./maps --src ./scen --dst ./scen-wp\n  wpgen --maps ./maps --src ./scen --dst ./scen-wp --n 4 --seed 42\n  RUST_LOG=debug wpgen --maps ./maps --src ./scen --dst ./scen-wp --json"
)]
pub struct Args {
    /// Directory containing .map files
    #[arg(long, value_name = "DIR")]
    pub maps: PathBuf,

    /// Root directory of original scenario folders, one per map
    #[arg(long, value_name = "DIR")]
    pub src: PathBuf,

    /// Root directory for waypoint-augmented scenarios
    #[arg(long, value_name = "DIR")]
    pub dst: PathBuf,

    /// Waypoints per agent (legacy mode: emit exactly this one count)
    #[arg(long, value_name = "N")]
    pub n: Option<usize>,

    /// Random seed for deterministic waypoint sampling
    #[arg(long, value_name = "SEED", default_value_t = 0)]
    pub seed: u64,

    /// Also correct goal positions onto free cells (starts are always corrected)
    #[arg(long)]
    pub fix_goals: bool,

    /// Emit the run summary as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl Args {
    /// Requested waypoint counts, ascending. Legacy mode collapses the set
    /// to a single count.
    pub fn counts(&self) -> Vec<usize> {
        match self.n {
            Some(n) => vec![n],
            None => DEFAULT_COUNTS.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_count_is_the_default() {
        let args = Args::parse_from(["wpgen", "--maps", "m", "--src", "s", "--dst", "d"]);
        assert_eq!(args.counts(), vec![0, 1, 2, 4, 8]);
        assert_eq!(args.seed, 0);
        assert!(!args.fix_goals);
    }

    #[test]
    fn legacy_mode_emits_one_count() {
        let args = Args::parse_from([
            "wpgen", "--maps", "m", "--src", "s", "--dst", "d", "--n", "4", "--seed", "9",
        ]);
        assert_eq!(args.counts(), vec![4]);
        assert_eq!(args.seed, 9);
    }
}
