use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tactics::replay;
use tools::{init_tracing, load_config, load_journal, load_setup};

/// Replays an intent journal against a scenario and prints the final state.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ASCII scenario layout the journal was recorded on
    #[arg(short, long)]
    scenario: PathBuf,
    /// Path to the journal JSON file to replay
    #[arg(short, long)]
    journal: PathBuf,
    /// Optional TOML tuning overrides
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the full event log as JSON lines
    #[arg(long)]
    events: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let setup = load_setup(&args.scenario)?;
    let config = load_config(args.config.as_deref())?;
    let journal = load_journal(&args.journal)?;
    tracing::info!(seed = journal.seed, intents = journal.len(), "replaying journal");

    let result = replay(setup, config, &journal).context("replay failed")?;

    if args.events {
        for event in &result.log {
            println!("{}", serde_json::to_string(event).context("failed to encode event")?);
        }
    }
    println!("Replay complete.");
    println!("Turn: {}", result.turn);
    println!("Outcome: {:?}", result.outcome);
    println!("Snapshot Hash: {}", result.snapshot_hash);

    Ok(())
}
