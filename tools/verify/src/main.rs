//! Post-hoc verification of hierarchical consistency.
//!
//! Compares two waypoint-augmented scenario files for the same map and
//! checks, agent by agent, that the original fields match and that the
//! first file's waypoint sequence is a prefix of the second file's.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "wpverify",
    version,
    about = "Verify waypoint prefix consistency between two augmented scenario files",
    after_help = "Example:\n  wpverify maze_2wp/maze-1.scen maze_4wp/maze-1.scen"
)]
struct Args {
    /// Augmented scenario file with the smaller waypoint count
    file1: PathBuf,

    /// Augmented scenario file with the larger waypoint count
    file2: PathBuf,
}

#[derive(Debug, PartialEq, Eq)]
struct AgentRecord {
    original: Vec<String>,
    waypoints: Vec<(i32, i32)>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let agents1 = load_agents(&args.file1)?;
    let agents2 = load_agents(&args.file2)?;

    if agents1.len() != agents2.len() {
        bail!(
            "agent count mismatch: {} has {}, {} has {}",
            args.file1.display(),
            agents1.len(),
            args.file2.display(),
            agents2.len()
        );
    }

    let mut mismatches = 0;
    for (index, (first, second)) in agents1.iter().zip(&agents2).enumerate() {
        let agent = index + 1;
        if first.original != second.original {
            println!("agent {agent}: original fields differ");
            mismatches += 1;
            continue;
        }
        let n = first.waypoints.len();
        if second.waypoints.len() < n {
            println!(
                "agent {agent}: second file has fewer waypoints ({} < {n})",
                second.waypoints.len()
            );
            mismatches += 1;
            continue;
        }
        if first.waypoints != second.waypoints[..n] {
            println!("agent {agent}: waypoint prefix mismatch");
            println!("  file1:          {:?}", first.waypoints);
            println!("  file2 first {n}: {:?}", &second.waypoints[..n]);
            mismatches += 1;
        }
    }

    let total = agents1.len();
    println!("agents compared: {total}");
    println!("mismatches: {mismatches}");
    if mismatches > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn load_agents(path: &Path) -> Result<Vec<AgentRecord>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut agents = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with("version") || line.starts_with("Version") {
            continue;
        }
        match parse_agent_line(line) {
            Some(record) => agents.push(record),
            None => bail!("{}:{}: unparsable agent line", path.display(), index + 1),
        }
    }
    Ok(agents)
}

/// Parse `9 original fields + count + count×2 coordinates`, tab-delimited.
fn parse_agent_line(line: &str) -> Option<AgentRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 10 {
        return None;
    }
    let original: Vec<String> = fields[..9].iter().map(|field| field.to_string()).collect();
    let count: usize = fields[9].parse().ok()?;
    if fields.len() != 10 + count * 2 {
        return None;
    }
    let mut waypoints = Vec::with_capacity(count);
    for pair in fields[10..].chunks(2) {
        let x = pair[0].parse().ok()?;
        let y = pair[1].parse().ok()?;
        waypoints.push((x, y));
    }
    Some(AgentRecord {
        original,
        waypoints,
    })
}
