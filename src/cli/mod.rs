// src/cli/mod.rs

//! CLI definitions for netseed
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.

use clap::{Parser, Subcommand};
use netseed::config::{NETWORK_CONFIG_ENV, NETWORK_STATE_ENV, TARGET_ENV};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netseed")]
#[command(author = "Netseed Project")]
#[command(version)]
#[command(about = "Apply network configuration to an installation target", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render network configuration into the target and clean up legacy config
    ApplyNet {
        /// File to read containing network state
        #[arg(short = 's', long, value_name = "NETSTATE", env = NETWORK_STATE_ENV)]
        net_state: Option<PathBuf>,

        /// Target filesystem root to configure networking in
        #[arg(short, long, value_name = "TARGET", env = TARGET_ENV)]
        target: Option<PathBuf>,

        /// Force the postup alias setting instead of detecting it from the
        /// target's ifupdown version
        #[arg(short = 'a', long, value_name = "POST")]
        postup_alias: Option<String>,

        /// File to read containing network config
        #[arg(short = 'c', long, value_name = "NETCONFIG", env = NETWORK_CONFIG_ENV)]
        net_config: Option<PathBuf>,
    },

    /// Convert a network config into a network state file
    NetState {
        /// File to read containing network config
        #[arg(short = 'c', long, value_name = "NETCONFIG", env = NETWORK_CONFIG_ENV)]
        net_config: PathBuf,

        /// Where to write the network state
        #[arg(short, long, value_name = "NETSTATE")]
        output: PathBuf,
    },
}
