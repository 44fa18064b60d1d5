// src/commands/net_state.rs

//! The net-state command

use anyhow::{Context, Result};
use netseed::net::{parse_net_config, save_state_file};
use std::path::Path;

/// Translate a network config into a reusable network state file
pub fn cmd_net_state(net_config: &Path, output: &Path) -> Result<()> {
    let state = parse_net_config(net_config)
        .with_context(|| format!("Failed to parse {}", net_config.display()))?;
    save_state_file(&state, output)?;
    println!(
        "Wrote network state for {} interface(s) to {}",
        state.interfaces.len(),
        output.display()
    );
    Ok(())
}
