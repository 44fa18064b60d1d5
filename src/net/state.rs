// src/net/state.rs

//! Loading and saving network state files

use super::NetworkState;
use crate::error::{Error, Result};
use crate::filesystem::{write_file_atomic, CONFIG_MODE};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Key under which a state document may be nested
const STATE_KEY: &str = "network_state";

/// Parse a network state document
///
/// Accepts the state either at the top level or nested under
/// `network_state:`.
pub fn parse_state(content: &str) -> Result<NetworkState> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)?;

    let document = match document {
        serde_yaml::Value::Mapping(mut map) => match map.remove(STATE_KEY) {
            Some(inner) => inner,
            None => serde_yaml::Value::Mapping(map),
        },
        serde_yaml::Value::Null => {
            return Err(Error::ParseError("network state document is empty".to_string()));
        }
        _ => {
            return Err(Error::ParseError(
                "network state document must be a mapping".to_string(),
            ));
        }
    };

    let state: NetworkState = serde_yaml::from_value(document)?;
    state.validate()?;
    Ok(state)
}

/// Load a network state file written by an earlier run
pub fn from_state_file(path: &Path) -> Result<NetworkState> {
    debug!("Loading network state from {}", path.display());
    let content = fs::read_to_string(path).map_err(|e| {
        Error::IoError(format!("Failed to read network state {}: {}", path.display(), e))
    })?;
    parse_state(&content)
}

/// Persist a network state so a later run can reuse it
pub fn save_state_file(state: &NetworkState, path: &Path) -> Result<()> {
    let content = serde_yaml::to_string(state)?;
    write_file_atomic(path, content.as_bytes(), CONFIG_MODE)
}
