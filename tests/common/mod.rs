// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use netseed::version::VersionInfo;
use netseed::{Result, VersionProbe};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Minimal declarative config with one DHCP interface and one static alias
pub const NETWORK_CONFIG: &str = r#"network:
  version: 1
  config:
    - type: physical
      name: eth0
      mac_address: "52:54:00:12:34:00"
      subnets:
        - type: dhcp4
        - type: static
          address: 192.168.1.10/24
          gateway: 192.168.1.1
    - type: nameserver
      address: [8.8.8.8]
      search: [example.com]
"#;

/// Create an empty target root next to a scratch area for inputs.
///
/// Returns (TempDir, target) - keep the TempDir alive to prevent cleanup.
pub fn setup_target() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let target = temp_dir.path().join("target");
    fs::create_dir_all(&target).unwrap();
    (temp_dir, target)
}

/// Write `content` at `relative` under `root`, creating parents
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Write the sample network config outside the target
pub fn write_network_config(temp_dir: &TempDir) -> PathBuf {
    write_file(temp_dir.path(), "input/network.yaml", NETWORK_CONFIG.as_bytes())
}

/// Probe reporting a fixed ifupdown version
pub struct FixedProbe(pub VersionInfo);

impl VersionProbe for FixedProbe {
    fn package_version(&self, _target: &Path, _package: &str) -> Result<VersionInfo> {
        Ok(self.0.clone())
    }
}
