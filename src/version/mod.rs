// src/version/mod.rs

//! Installed package version handling
//!
//! Debian package versions take the form `[epoch:]upstream[-revision]`.
//! Only the leading numeric `major.minor.micro` of the upstream part
//! matters for compatibility decisions, so it is reduced to a
//! `semver::Version` and compared as an ordered triple.

use crate::error::{Error, Result};
use semver::Version;
use std::cmp::Ordering;
use std::fmt;

/// Upper bound for each packed component of `VersionInfo::semantic`
const SEMANTIC_COMPONENT_MAX: u64 = 999;

/// Reduced view of an installed package version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub major: u64,
    pub minor: u64,
    pub micro: u64,
    /// Monotonic packing of the triple, for logging
    pub semantic: u64,
    /// Version string exactly as reported by the package database
    pub raw: String,
}

impl VersionInfo {
    /// Build from explicit components
    pub fn new(major: u64, minor: u64, micro: u64) -> Self {
        Self {
            major,
            minor,
            micro,
            semantic: pack(major, minor, micro),
            raw: format!("{}.{}.{}", major, minor, micro),
        }
    }

    /// Parse a dpkg version string
    ///
    /// Examples:
    /// - "0.7.47.2ubuntu4.1" → 0.7.47
    /// - "0.8.10ubuntu1" → 0.8.10
    /// - "1:0.8.35-1" → 0.8.35
    /// - "2.0" → 2.0.0
    pub fn parse_dpkg(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        // Epoch only orders across upstream renumbering; it carries no
        // information about the upstream release itself.
        let without_epoch = match trimmed.split_once(':') {
            Some((_, rest)) => rest,
            None => trimmed,
        };

        let upstream = match without_epoch.rsplit_once('-') {
            Some((upstream, _revision)) => upstream,
            None => without_epoch,
        };

        let numeric_end = upstream
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(upstream.len());
        let numeric = upstream[..numeric_end].trim_end_matches('.');

        let mut parts = numeric.splitn(3, '.');
        let component = |part: Option<&str>, name: &str, required: bool| -> Result<u64> {
            match part {
                Some(s) if !s.is_empty() => s.parse::<u64>().map_err(|e| {
                    Error::ProbeUnavailable(format!(
                        "Invalid {} component in version '{}': {}",
                        name, raw, e
                    ))
                }),
                _ if required => Err(Error::ProbeUnavailable(format!(
                    "No numeric {} component in version '{}'",
                    name, raw
                ))),
                _ => Ok(0),
            }
        };

        let major = component(parts.next(), "major", true)?;
        let minor = component(parts.next(), "minor", false)?;
        // The third split keeps any further dotted parts ("47.2")
        let micro_part = parts.next().map(|s| s.split('.').next().unwrap_or(""));
        let micro = component(micro_part, "micro", false)?;

        Ok(Self {
            major,
            minor,
            micro,
            semantic: pack(major, minor, micro),
            raw: raw.to_string(),
        })
    }

    /// The triple as a `semver::Version` for ordering
    pub fn to_semver(&self) -> Version {
        Version::new(self.major, self.minor, self.micro)
    }

    /// Whether this version is strictly older than `other`
    pub fn is_older_than(&self, other: &VersionInfo) -> bool {
        self.cmp(other) == Ordering::Less
    }
}

fn pack(major: u64, minor: u64, micro: u64) -> u64 {
    let clamp = |v: u64| v.min(SEMANTIC_COMPONENT_MAX);
    clamp(major) * 1_000_000 + clamp(minor) * 1_000 + clamp(micro)
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

impl Ord for VersionInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_semver().cmp(&other.to_semver())
    }
}

impl PartialOrd for VersionInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trusty_ifupdown() {
        let v = VersionInfo::parse_dpkg("0.7.47.2ubuntu4.4").unwrap();
        assert_eq!((v.major, v.minor, v.micro), (0, 7, 47));
        assert_eq!(v.raw, "0.7.47.2ubuntu4.4");
    }

    #[test]
    fn test_parse_with_revision() {
        let v = VersionInfo::parse_dpkg("0.8.10ubuntu1.4").unwrap();
        assert_eq!((v.major, v.minor, v.micro), (0, 8, 10));

        let v = VersionInfo::parse_dpkg("0.8.35-1").unwrap();
        assert_eq!((v.major, v.minor, v.micro), (0, 8, 35));
    }

    #[test]
    fn test_parse_with_epoch() {
        let v = VersionInfo::parse_dpkg("1:2.3.4-5").unwrap();
        assert_eq!((v.major, v.minor, v.micro), (2, 3, 4));
    }

    #[test]
    fn test_parse_short_versions() {
        let v = VersionInfo::parse_dpkg("2.0").unwrap();
        assert_eq!((v.major, v.minor, v.micro), (2, 0, 0));

        let v = VersionInfo::parse_dpkg("7").unwrap();
        assert_eq!((v.major, v.minor, v.micro), (7, 0, 0));

        let v = VersionInfo::parse_dpkg("3.1~rc1").unwrap();
        assert_eq!((v.major, v.minor, v.micro), (3, 1, 0));
    }

    #[test]
    fn test_parse_unusable() {
        assert!(VersionInfo::parse_dpkg("").is_err());
        assert!(VersionInfo::parse_dpkg("   ").is_err());
        assert!(VersionInfo::parse_dpkg("git20240101").is_err());
        assert!(VersionInfo::parse_dpkg("1:").is_err());
    }

    #[test]
    fn test_triple_ordering() {
        let threshold = VersionInfo::new(0, 8, 6);

        assert!(VersionInfo::parse_dpkg("0.7.47.2").unwrap().is_older_than(&threshold));
        assert!(VersionInfo::parse_dpkg("0.8.5").unwrap().is_older_than(&threshold));
        assert!(!VersionInfo::parse_dpkg("0.8.6").unwrap().is_older_than(&threshold));
        // A packed major*100+minor*10+micro would call this older
        assert!(!VersionInfo::parse_dpkg("0.8.10").unwrap().is_older_than(&threshold));
        assert!(!VersionInfo::parse_dpkg("1.0").unwrap().is_older_than(&threshold));
    }

    #[test]
    fn test_semantic_is_monotonic() {
        let a = VersionInfo::new(0, 8, 6);
        let b = VersionInfo::new(0, 8, 10);
        let c = VersionInfo::new(0, 9, 0);
        assert!(a.semantic < b.semantic);
        assert!(b.semantic < c.semantic);
        assert_eq!(a.semantic, 8_006);
    }

    #[test]
    fn test_display() {
        let v = VersionInfo::parse_dpkg("1:0.8.35-1").unwrap();
        assert_eq!(v.to_string(), "0.8.35");
    }
}
