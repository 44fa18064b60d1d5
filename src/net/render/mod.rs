// src/net/render/mod.rs

//! Rendering network state into target configuration files
//!
//! The orchestrator only depends on the `Renderer` trait; `EniRenderer`
//! is the ifupdown implementation used by the CLI.

mod eni;

pub use eni::{
    render_interfaces, render_persistent_net, EniRenderer, CLOUD_INIT_DISABLE_PATH, ENI_PATH,
    NET_RULES_PATH,
};

use super::NetworkState;
use crate::error::Result;
use std::path::Path;

/// Writes network configuration for a state into a target root
///
/// `postup_alias` asks for alias interfaces to be brought up from the
/// base interface rather than individually (see `compat`).
pub trait Renderer {
    fn render(&self, target: &Path, state: &NetworkState, postup_alias: bool) -> Result<()>;
}

impl<R: Renderer + ?Sized> Renderer for &R {
    fn render(&self, target: &Path, state: &NetworkState, postup_alias: bool) -> Result<()> {
        (**self).render(target, state, postup_alias)
    }
}
