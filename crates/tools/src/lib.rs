//! Loading helpers shared by the headless harnesses.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tactics::{IntentJournal, MissionSetup, SimConfig};
use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

pub fn load_setup(path: &Path) -> Result<MissionSetup> {
    let layout = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file: {}", path.display()))?;
    MissionSetup::from_ascii(&layout)
        .with_context(|| format!("failed to parse scenario layout: {}", path.display()))
}

/// Tuning from a TOML file; missing fields and a missing path fall back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config TOML: {}", path.display()))
}

pub fn load_journal(path: &Path) -> Result<IntentJournal> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read journal file: {}", path.display()))?;
    IntentJournal::from_json(&json).context("failed to deserialize journal JSON")
}
