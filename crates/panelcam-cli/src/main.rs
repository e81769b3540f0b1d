//! panelcam CLI - plan CNC joinery for panel furniture
//!
//! Reads a TOML job (parts, placements, joints) and prints the resulting
//! tool passes per part.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod job;

use job::Job;

#[derive(Parser)]
#[command(name = "panelcam")]
#[command(about = "Plan dowels and fittings for flat-panel furniture", long_about = None)]
struct Cli {
    /// More logging (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a job and print every part's passes
    Plan {
        /// Job file
        job: PathBuf,
        /// Print the plan as JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Run a job, cut every part and report totals
    Check {
        /// Job file
        job: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Plan { job, json } => plan(&job, json)?,
        Commands::Check { job } => check(&job)?,
    }

    Ok(())
}

fn plan(path: &Path, json: bool) -> Result<()> {
    let outcome = Job::load(path)?.run()?;
    if json {
        println!("{}", outcome.assembly.plan().to_json()?);
    } else {
        print!("{}", outcome.assembly.listing());
    }
    Ok(())
}

fn check(path: &Path) -> Result<()> {
    let outcome = Job::load(path)?.run()?;
    let machined = outcome.assembly.materialize_all()?;
    let plan = outcome.assembly.plan();

    println!("Job: {}", path.display());
    println!("  Parts:       {}", machined.len());
    println!("  Dowels:      {}", outcome.dowels);
    println!("  Edge passes: {}", outcome.edge_passes);
    println!("  Tool passes: {}", plan.pass_count());
    for (part, m) in plan.parts.iter().zip(&machined) {
        println!("    {:<16} {:>3} tools", part.name, m.tools.len());
    }
    Ok(())
}
