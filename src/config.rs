// src/config.rs

//! Command environment for apply runs
//!
//! Installers hand paths over through environment variables; explicit
//! command-line flags win over them. Empty values count as unset.

use crate::apply::ApplyRequest;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Environment variable naming the target root
pub const TARGET_ENV: &str = "TARGET_MOUNT_POINT";

/// Environment variable naming the network state file
pub const NETWORK_STATE_ENV: &str = "OUTPUT_NETWORK_STATE";

/// Environment variable naming the network config file
pub const NETWORK_CONFIG_ENV: &str = "OUTPUT_NETWORK_CONFIG";

/// Values `value_as_boolean` treats as false
const FALSE_VALUES: &[&str] = &["", "0", "false", "False", "none", "None"];

/// Interpret a loosely-typed boolean setting
///
/// Anything that is not one of the recognised false spellings is true.
pub fn value_as_boolean(value: &str) -> bool {
    !FALSE_VALUES.contains(&value.trim())
}

/// Settings gathered from flags and environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyConfig {
    pub target: Option<PathBuf>,
    pub network_state: Option<PathBuf>,
    pub network_config: Option<PathBuf>,
    /// Raw `--postup-alias` value, interpreted by `value_as_boolean`
    pub postup_alias: Option<String>,
}

fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}

impl ApplyConfig {
    /// Validate and convert into an apply request
    pub fn into_request(self) -> Result<ApplyRequest> {
        let target = non_empty(self.target).ok_or_else(|| {
            Error::MissingInput(format!(
                "Unable to find target. Use --target or set {}",
                TARGET_ENV
            ))
        })?;

        let network_state = non_empty(self.network_state);
        let network_config = non_empty(self.network_config);
        if network_state.is_none() && network_config.is_none() {
            return Err(Error::MissingInput(
                "Must provide at least config or state".to_string(),
            ));
        }

        Ok(ApplyRequest {
            target,
            network_state,
            network_config,
            postup_alias: self.postup_alias.as_deref().map(value_as_boolean),
        })
    }
}
