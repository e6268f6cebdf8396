//! Two-pass hierarchical scenario building.
//!
//! Pass 1 parses and repairs every agent line and computes its reachable
//! cells. Pass 2 samples each agent's maximal waypoint sequence exactly
//! once at `max(counts)` and slices a prefix per requested count. The
//! single-sample-then-truncate shape is what guarantees that the sequence
//! emitted for a small count is always a prefix of the sequence emitted
//! for a larger one; per-count resampling would break that.

use crate::assign::{assign, SeedMaterial};
use crate::correct;
use crate::error::MapError;
use crate::grid::{Cell, Grid};
use crate::registry::UniquenessRegistry;
use crate::scenario::{parse_line, AgentLine, Line};
use std::collections::BTreeMap;

/// Knobs shared by every file of a run.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// Requested waypoint counts, ascending.
    pub counts: Vec<usize>,
    pub global_seed: u64,
    /// Open question in the source material: goals are corrected only when
    /// explicitly asked for; start correction is always on.
    pub fix_goals: bool,
}

/// Augmented text per requested count, plus per-file statistics.
#[derive(Debug, Default)]
pub struct FileOutputs {
    pub outputs: BTreeMap<usize, String>,
    pub agents: usize,
    pub positions_fixed: usize,
    /// Agents emitted with an empty sequence because nothing was reachable.
    pub degraded: usize,
    /// Waypoints drawn from the fallback pool across all agents.
    pub fallback_assignments: usize,
}

enum Entry {
    Passthrough(String),
    Agent {
        line: AgentLine,
        agent_id: u32,
        reachable: Vec<Cell>,
    },
}

/// Process one scenario file against its map.
///
/// `scenario_key` identifies the file for seeding and logging; `registry`
/// is the map-scoped uniqueness state, shared across all files of the map.
pub fn process_file(
    grid: &Grid,
    scenario_key: &str,
    text: &str,
    config: &BuildConfig,
    registry: &mut UniquenessRegistry,
) -> Result<FileOutputs, MapError> {
    let max_count = config.counts.iter().copied().max().unwrap_or(0);
    let mut outputs = FileOutputs::default();

    // Pass 1: parse, repair positions, compute reachability.
    let mut entries = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let raw = raw.trim_end_matches('\r');
        let agent_id = (index + 1) as u32;
        match parse_line(raw) {
            Line::Passthrough(line) => entries.push(Entry::Passthrough(line)),
            Line::Agent(mut line) => {
                outputs.agents += 1;
                let correction = correct::fix(grid, line.start())?;
                if correction.changed() {
                    outputs.positions_fixed += 1;
                    tracing::info!(
                        scenario = scenario_key,
                        agent = agent_id,
                        reason = ?correction.reason,
                        from = ?correction.original,
                        to = ?correction.fixed,
                        "corrected start position"
                    );
                    line.set_start(correction.fixed);
                }
                if config.fix_goals {
                    let correction = correct::fix(grid, line.goal())?;
                    if correction.changed() {
                        outputs.positions_fixed += 1;
                        tracing::info!(
                            scenario = scenario_key,
                            agent = agent_id,
                            reason = ?correction.reason,
                            from = ?correction.original,
                            to = ?correction.fixed,
                            "corrected goal position"
                        );
                        line.set_goal(correction.fixed);
                    }
                }

                let reachable_set = crate::reach::reachable(grid, line.start());
                // Row-major order keeps sampling independent of hash-set
                // iteration order.
                let reachable: Vec<Cell> = grid
                    .free_cells()
                    .iter()
                    .copied()
                    .filter(|cell| reachable_set.contains(cell))
                    .collect();
                if reachable.is_empty() {
                    outputs.degraded += 1;
                    tracing::warn!(
                        scenario = scenario_key,
                        agent = agent_id,
                        "start has no reachable cells; emitting empty waypoint list"
                    );
                } else if reachable.len() < max_count {
                    tracing::warn!(
                        scenario = scenario_key,
                        agent = agent_id,
                        reachable = reachable.len(),
                        requested = max_count,
                        "reachable set smaller than requested waypoint count"
                    );
                }
                entries.push(Entry::Agent {
                    line,
                    agent_id,
                    reachable,
                });
            }
        }
    }

    // Pass 2: one maximal draw per agent, in line order.
    let mut sequences: Vec<Vec<Cell>> = Vec::new();
    for entry in &entries {
        let Entry::Agent {
            agent_id,
            reachable,
            ..
        } = entry
        else {
            continue;
        };
        let cells = if max_count == 0 || reachable.is_empty() {
            Vec::new()
        } else {
            let material = SeedMaterial {
                global_seed: config.global_seed,
                agent_id: *agent_id,
                scenario_key,
            };
            let assignment = assign(&material, reachable, registry, max_count);
            outputs.fallback_assignments += assignment.fallback_count;
            assignment.cells
        };
        sequences.push(cells);
    }

    // Emit: prefix of the maximal sequence per requested count.
    for &count in &config.counts {
        let mut out = String::new();
        let mut agent_index = 0;
        for entry in &entries {
            match entry {
                Entry::Passthrough(line) => out.push_str(line),
                Entry::Agent { line, .. } => {
                    let sequence = &sequences[agent_index];
                    agent_index += 1;
                    let prefix = &sequence[..count.min(sequence.len())];
                    out.push_str(&line.format_augmented(prefix));
                }
            }
            out.push('\n');
        }
        outputs.outputs.insert(count, out);
    }

    Ok(outputs)
}
