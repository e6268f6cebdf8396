//! Run orchestration: map loading, scenario-tree traversal, output writing.
//!
//! Per-file and per-map failures are recorded in the summary and logged,
//! never propagated past the map boundary; only an unreadable maps or
//! source directory fails the run.

use crate::builder::{process_file, BuildConfig};
use crate::cli::Args;
use crate::grid::Grid;
use crate::registry::UniquenessRegistry;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Machine-readable outcome of one run.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub maps_loaded: usize,
    pub scenario_files_processed: usize,
    pub files_written: usize,
    pub agents_processed: usize,
    pub positions_fixed: usize,
    pub degraded_agents: usize,
    pub fallback_assignments: usize,
    /// Items skipped with the reason, in encounter order.
    pub skipped: Vec<String>,
}

impl RunSummary {
    fn skip(&mut self, what: impl Into<String>) {
        let what = what.into();
        tracing::warn!("skipping {what}");
        self.skipped.push(what);
    }
}

/// Execute a full generation run.
pub fn run(args: &Args) -> Result<RunSummary> {
    let config = BuildConfig {
        counts: args.counts(),
        global_seed: args.seed,
        fix_goals: args.fix_goals,
    };
    let mut summary = RunSummary::default();

    let maps = load_maps(&args.maps, &mut summary)?;
    summary.maps_loaded = maps.len();

    fs::create_dir_all(&args.dst)
        .with_context(|| format!("create {}", args.dst.display()))?;

    let mut map_dirs: Vec<PathBuf> = fs::read_dir(&args.src)
        .with_context(|| format!("read {}", args.src.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.is_dir())
        .collect();
    map_dirs.sort();

    for map_dir in map_dirs {
        let map_name = match map_dir.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let Some(grid) = maps.get(&map_name) else {
            summary.skip(format!("{}: no map file loaded for it", map_dir.display()));
            continue;
        };
        process_map(&map_name, &map_dir, grid, args, &config, &mut summary);
    }

    Ok(summary)
}

/// Process every scenario file of one map against a fresh registry.
fn process_map(
    map_name: &str,
    map_dir: &Path,
    grid: &Grid,
    args: &Args,
    config: &BuildConfig,
    summary: &mut RunSummary,
) {
    let mut registry = UniquenessRegistry::new();
    let mut scen_files: Vec<PathBuf> = match fs::read_dir(map_dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "scen"))
            .collect(),
        Err(err) => {
            summary.skip(format!("{}: {err}", map_dir.display()));
            return;
        }
    };
    scen_files.sort();

    for scen_path in scen_files {
        let text = match fs::read_to_string(&scen_path) {
            Ok(text) => text,
            Err(err) => {
                summary.skip(format!("{}: {err}", scen_path.display()));
                continue;
            }
        };
        let scenario_key = scen_path.display().to_string();
        let outputs = match process_file(grid, &scenario_key, &text, config, &mut registry) {
            Ok(outputs) => outputs,
            Err(err) => {
                summary.skip(format!("{}: {err}", scen_path.display()));
                continue;
            }
        };

        summary.scenario_files_processed += 1;
        summary.agents_processed += outputs.agents;
        summary.positions_fixed += outputs.positions_fixed;
        summary.degraded_agents += outputs.degraded;
        summary.fallback_assignments += outputs.fallback_assignments;

        let file_name = scen_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "scenario.scen".to_string());
        for (count, text) in &outputs.outputs {
            let out_dir = output_dir(&args.dst, map_name, *count, args.n.is_some());
            let out_path = out_dir.join(&file_name);
            if let Err(err) = write_output(&out_path, text) {
                summary.skip(format!("{}: {err:#}", out_path.display()));
                continue;
            }
            summary.files_written += 1;
        }
        tracing::info!(
            scenario = %scen_path.display(),
            agents = outputs.agents,
            fixed = outputs.positions_fixed,
            "processed scenario file"
        );
    }
    tracing::debug!(
        map = map_name,
        committed_waypoints = registry.len(),
        "finished map"
    );
}

/// Legacy mode keeps the original directory layout; multi-count mode adds
/// one sibling subdirectory per count.
fn output_dir(dst: &Path, map_name: &str, count: usize, legacy: bool) -> PathBuf {
    if legacy {
        dst.join(map_name)
    } else {
        dst.join(format!("{map_name}_{count}wp"))
    }
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Load every `*.map` file in the maps directory. Malformed or fully
/// blocked maps are recorded and skipped; their scenarios are skipped later
/// by the name lookup.
fn load_maps(maps_dir: &Path, summary: &mut RunSummary) -> Result<BTreeMap<String, Grid>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(maps_dir)
        .with_context(|| format!("read {}", maps_dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "map"))
        .collect();
    paths.sort();

    let mut maps = BTreeMap::new();
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                summary.skip(format!("{}: {err}", path.display()));
                continue;
            }
        };
        let grid = match Grid::parse(&text) {
            Ok(grid) => grid,
            Err(err) => {
                summary.skip(format!("{}: {err}", path.display()));
                continue;
            }
        };
        if grid.free_cells().is_empty() {
            summary.skip(format!("{}: map has no free cells", path.display()));
            continue;
        }
        tracing::info!(
            map = stem,
            width = grid.width(),
            height = grid.height(),
            free = grid.free_cells().len(),
            "loaded map"
        );
        maps.insert(stem.to_string(), grid);
    }
    Ok(maps)
}
