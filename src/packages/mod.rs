// src/packages/mod.rs

//! Installed package queries against the target root
//!
//! Each backend implements the `VersionProbe` trait:
//! - `DpkgStatusProbe` reads the dpkg status database directly
//! - `DpkgQueryProbe` asks `dpkg-query` with the target's admin directory
//!
//! `default_probe` prefers `dpkg-query` when it exists on the host and
//! falls back to reading the status file otherwise.

pub mod dpkg_query;
pub mod dpkg_status;
pub mod traits;

pub use dpkg_query::DpkgQueryProbe;
pub use dpkg_status::DpkgStatusProbe;
pub use traits::VersionProbe;

/// Relative location of the dpkg admin directory in a target root
pub const DPKG_ADMIN_DIR: &str = "var/lib/dpkg";

/// Pick the best available probe for this host
pub fn default_probe() -> Box<dyn VersionProbe> {
    if dpkg_query::is_dpkg_query_available() {
        Box::new(DpkgQueryProbe::new())
    } else {
        Box::new(DpkgStatusProbe::new())
    }
}
