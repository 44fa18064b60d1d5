// src/apply.rs

//! Applying network configuration to a target root
//!
//! The sequence is fixed:
//! 1. resolve the network state (fatal on failure)
//! 2. decide the postup alias flag (override, else detect from the target)
//! 3. render (fatal on failure)
//! 4. reconcile each legacy artifact (failures are reported, never fatal)
//! 5. install the IPv6 MTU hooks (fatal on failure)

use crate::compat::detect_postup_alias;
use crate::error::{Error, Result};
use crate::hooks::{install_hooks, IPV6_MTU_HOOKS};
use crate::net::{resolve, Renderer};
use crate::packages::VersionProbe;
use crate::reconcile::{reconcile, ReconciliationOutcome, LEGACY_ARTIFACTS};
use crate::report::Reporter;
use std::path::PathBuf;
use tracing::info;

/// Inputs for one apply run
#[derive(Debug, Clone, Default)]
pub struct ApplyRequest {
    /// Root of the filesystem being installed
    pub target: PathBuf,
    /// Network state written by an earlier run
    pub network_state: Option<PathBuf>,
    /// Declarative network config
    pub network_config: Option<PathBuf>,
    /// Force the postup alias decision instead of probing the target
    pub postup_alias: Option<bool>,
}

/// Result of reconciling one legacy artifact during an apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyResult {
    /// Path relative to the target root
    pub path: &'static str,
    /// `None` when reconciliation failed; the failure was reported
    pub outcome: Option<ReconciliationOutcome>,
}

/// What an apply run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub postup_alias: bool,
    pub legacy: Vec<LegacyResult>,
    pub hooks: Vec<PathBuf>,
}

impl ApplyRequest {
    fn validate(&self) -> Result<()> {
        if self.target.as_os_str().is_empty() {
            return Err(Error::MissingInput("Must provide target".to_string()));
        }
        if self.network_state.is_none() && self.network_config.is_none() {
            return Err(Error::MissingInput(
                "Must provide at least config or state".to_string(),
            ));
        }
        if !self.target.is_dir() {
            return Err(Error::InvalidPath(format!(
                "target root {} is not a directory",
                self.target.display()
            )));
        }
        Ok(())
    }
}

/// Render network configuration into the target and clean up after it
pub fn apply_network_configuration(
    request: &ApplyRequest,
    renderer: &dyn Renderer,
    probe: &dyn VersionProbe,
    reporter: &dyn Reporter,
) -> Result<ApplyReport> {
    request.validate()?;
    let target = request.target.as_path();

    let state = resolve(
        request.network_state.as_deref(),
        request.network_config.as_deref(),
    )?;

    let postup_alias = match request.postup_alias {
        Some(value) => value,
        None => detect_postup_alias(target, probe, reporter),
    };

    info!("Applying network configuration to {}", target.display());
    renderer.render(target, &state, postup_alias)?;

    let mut legacy = Vec::with_capacity(LEGACY_ARTIFACTS.len());
    for spec in &LEGACY_ARTIFACTS {
        let outcome = match reconcile(target, spec, reporter) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                reporter.failure(&target.join(spec.path), &e.to_string());
                None
            }
        };
        legacy.push(LegacyResult {
            path: spec.path,
            outcome,
        });
    }

    let hooks = install_hooks(target, &IPV6_MTU_HOOKS, reporter)?;

    info!("Applied network configuration successfully");
    Ok(ApplyReport {
        postup_alias,
        legacy,
        hooks,
    })
}
