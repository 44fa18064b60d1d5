// src/main.rs

use anyhow::Result;
use clap::Parser;
use netseed::config::ApplyConfig;
use std::process::ExitCode;

mod cli;
mod commands;

use cli::{Cli, Commands};

/// Exit status when required inputs were not supplied
const EXIT_MISSING_INPUT: u8 = 2;

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::ApplyNet {
            net_state,
            target,
            postup_alias,
            net_config,
        }) => commands::cmd_apply_net(ApplyConfig {
            target,
            network_state: net_state,
            network_config: net_config,
            postup_alias,
        }),
        Some(Commands::NetState { net_config, output }) => {
            commands::cmd_net_state(&net_config, &output)
        }
        None => {
            // No command provided, show help
            println!("netseed v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'netseed --help' for usage information");
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let missing_input = e
                .downcast_ref::<netseed::Error>()
                .is_some_and(netseed::Error::is_missing_input);
            if missing_input {
                ExitCode::from(EXIT_MISSING_INPUT)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}
