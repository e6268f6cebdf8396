use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod assign;
mod builder;
mod cli;
mod correct;
mod error;
mod grid;
mod reach;
mod registry;
mod scenario;
mod workflow;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let summary = workflow::run(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    // Exit code reflects whether any output was written; partial failures
    // are already in the summary.
    if summary.files_written == 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn print_summary(summary: &workflow::RunSummary) {
    println!("maps loaded: {}", summary.maps_loaded);
    println!(
        "scenario files processed: {}",
        summary.scenario_files_processed
    );
    println!("output files written: {}", summary.files_written);
    println!("agents processed: {}", summary.agents_processed);
    println!("positions fixed: {}", summary.positions_fixed);
    if summary.degraded_agents > 0 {
        println!("agents with empty waypoints: {}", summary.degraded_agents);
    }
    if summary.fallback_assignments > 0 {
        println!(
            "fallback waypoint assignments: {}",
            summary.fallback_assignments
        );
    }
    if !summary.skipped.is_empty() {
        println!("skipped:");
        for item in &summary.skipped {
            println!("  {item}");
        }
    }
}
