// src/net/resolve.rs

//! Choosing where the network state comes from

use super::{config::parse_net_config, state::from_state_file, NetworkState};
use crate::error::{Error, Result};
use std::path::Path;
use tracing::info;

/// Resolve the network state from exactly one source
///
/// When both sources are given the state file wins and the config is
/// ignored.
pub fn resolve(state_file: Option<&Path>, network_config: Option<&Path>) -> Result<NetworkState> {
    match (state_file, network_config) {
        (Some(state), Some(config)) => {
            info!(
                "Both network state {} and network config {} given; using network state",
                state.display(),
                config.display()
            );
            from_state_file(state)
        }
        (Some(state), None) => from_state_file(state),
        (None, Some(config)) => parse_net_config(config),
        (None, None) => Err(Error::MissingInput(
            "Must provide at least config or state".to_string(),
        )),
    }
}
