// src/packages/dpkg_status.rs

//! Read installed package versions from a target's dpkg status file
//!
//! The status database (`var/lib/dpkg/status`) is a sequence of RFC 822
//! style stanzas, one per package. Reading it directly needs neither
//! `dpkg` on the host nor a chroot into the target.

use super::traits::VersionProbe;
use super::DPKG_ADMIN_DIR;
use crate::error::{Error, Result};
use crate::version::VersionInfo;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One stanza of the dpkg status database
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatusRecord {
    pub package: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub architecture: Option<String>,
}

impl StatusRecord {
    /// Whether dpkg considers the package fully installed
    ///
    /// Status is "want flag state", e.g. "install ok installed" or
    /// "deinstall ok config-files".
    pub fn is_installed(&self) -> bool {
        self.status
            .as_deref()
            .and_then(|s| s.split_whitespace().last())
            .is_some_and(|state| state == "installed")
    }
}

/// Version probe backed by `<target>/var/lib/dpkg/status`
#[derive(Debug, Clone, Default)]
pub struct DpkgStatusProbe;

impl DpkgStatusProbe {
    pub fn new() -> Self {
        Self
    }

    fn status_path(target: &Path) -> PathBuf {
        target.join(DPKG_ADMIN_DIR).join("status")
    }
}

/// Parse a dpkg status database
pub fn parse_status(content: &str) -> Result<Vec<StatusRecord>> {
    rfc822_like::from_str(content)
        .map_err(|e| Error::ProbeUnavailable(format!("Malformed dpkg status database: {}", e)))
}

impl VersionProbe for DpkgStatusProbe {
    fn package_version(&self, target: &Path, package: &str) -> Result<VersionInfo> {
        let path = Self::status_path(target);
        debug!("Reading dpkg status database: {}", path.display());

        let content = fs::read_to_string(&path).map_err(|e| {
            Error::ProbeUnavailable(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let record = parse_status(&content)?
            .into_iter()
            .find(|r| r.package == package && r.is_installed())
            .ok_or_else(|| {
                Error::ProbeUnavailable(format!(
                    "Package '{}' is not installed in {}",
                    package,
                    target.display()
                ))
            })?;

        let raw = record.version.ok_or_else(|| {
            Error::ProbeUnavailable(format!("Package '{}' has no Version field", package))
        })?;

        VersionInfo::parse_dpkg(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS: &str = "\
Package: ifupdown
Status: install ok installed
Priority: important
Section: admin
Architecture: amd64
Version: 0.7.47.2ubuntu4.4
Description: high level tools to configure network interfaces

Package: isc-dhcp-client
Status: deinstall ok config-files
Architecture: amd64
Version: 4.2.4-7ubuntu12
Description: DHCP client for automatically obtaining an IP address
";

    fn target_with_status(content: &str) -> tempfile::TempDir {
        let temp = tempfile::tempdir().unwrap();
        let admin = temp.path().join(DPKG_ADMIN_DIR);
        fs::create_dir_all(&admin).unwrap();
        fs::write(admin.join("status"), content).unwrap();
        temp
    }

    #[test]
    fn test_is_installed() {
        let mut record = StatusRecord {
            package: "x".to_string(),
            status: Some("install ok installed".to_string()),
            version: None,
            architecture: None,
        };
        assert!(record.is_installed());

        record.status = Some("deinstall ok config-files".to_string());
        assert!(!record.is_installed());

        record.status = None;
        assert!(!record.is_installed());
    }

    #[test]
    fn test_probe_finds_installed_package() {
        let target = target_with_status(STATUS);
        let version = DpkgStatusProbe::new()
            .package_version(target.path(), "ifupdown")
            .unwrap();
        assert_eq!((version.major, version.minor, version.micro), (0, 7, 47));
    }

    #[test]
    fn test_probe_skips_config_files_only_package() {
        let target = target_with_status(STATUS);
        let err = DpkgStatusProbe::new()
            .package_version(target.path(), "isc-dhcp-client")
            .unwrap_err();
        assert!(matches!(err, Error::ProbeUnavailable(_)));
    }

    #[test]
    fn test_probe_missing_package() {
        let target = target_with_status(STATUS);
        assert!(matches!(
            DpkgStatusProbe::new().package_version(target.path(), "netplan.io"),
            Err(Error::ProbeUnavailable(_))
        ));
    }

    #[test]
    fn test_probe_missing_database() {
        let temp = tempfile::tempdir().unwrap();
        assert!(matches!(
            DpkgStatusProbe::new().package_version(temp.path(), "ifupdown"),
            Err(Error::ProbeUnavailable(_))
        ));
    }
}
