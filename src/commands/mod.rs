// src/commands/mod.rs

//! Command handlers for the netseed CLI

mod apply_net;
mod net_state;

pub use apply_net::cmd_apply_net;
pub use net_state::cmd_net_state;
