// src/lib.rs

//! Netseed
//!
//! Applies a network configuration to an installation target root: the
//! filesystem of an operating system that is being installed but is not
//! running yet.
//!
//! # Architecture
//!
//! - Resolution: a saved network state wins over a declarative config
//! - Rendering: `/etc/network/interfaces` style output behind `Renderer`
//! - Compatibility: the target's ifupdown version picks the alias style
//! - Reconciliation: distro-shipped files are removed only when untouched
//! - Hooks: IPv6 MTU scripts installed atomically with exec permissions
//!
//! Everything runs against the target root and never the host's `/`.

pub mod apply;
pub mod compat;
pub mod config;
mod error;
pub mod filesystem;
pub mod hooks;
pub mod net;
pub mod packages;
pub mod reconcile;
pub mod report;
pub mod version;

pub use apply::{apply_network_configuration, ApplyReport, ApplyRequest, LegacyResult};
pub use error::{Error, Result};
pub use net::{EniRenderer, NetworkState, Renderer};
pub use packages::VersionProbe;
pub use reconcile::{reconcile, LegacyArtifactSpec, MatchPolicy, ReconciliationOutcome};
pub use report::{CallbackReporter, LogReporter, ReportEvent, Reporter, SilentReporter};
pub use version::VersionInfo;
