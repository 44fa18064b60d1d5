// src/commands/apply_net.rs

//! The apply-net command

use anyhow::Result;
use netseed::apply::apply_network_configuration;
use netseed::config::ApplyConfig;
use netseed::net::EniRenderer;
use netseed::packages::default_probe;
use netseed::report::LogReporter;
use tracing::info;

/// Apply network configuration to the target described by `config`
pub fn cmd_apply_net(config: ApplyConfig) -> Result<()> {
    let request = config.into_request()?;
    let probe = default_probe();

    let report = apply_network_configuration(&request, &EniRenderer::new(), &*probe, &LogReporter)?;

    info!("postup alias: {}", report.postup_alias);
    for result in &report.legacy {
        match result.outcome {
            Some(outcome) => info!("{}: {}", result.path, outcome),
            None => info!("{}: not reconciled", result.path),
        }
    }
    Ok(())
}
