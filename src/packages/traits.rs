// src/packages/traits.rs

//! Common trait for querying package versions inside a target root

use crate::error::Result;
use crate::version::VersionInfo;
use std::path::Path;

/// Looks up the version of an installed package in a target root
///
/// Implementations must only read package metadata belonging to the
/// target, never the database of the host running the installer.
/// Failure (`Error::ProbeUnavailable`) is ordinary: the package may be
/// absent or its metadata unreadable.
pub trait VersionProbe {
    /// Version of `package` as installed under `target`
    fn package_version(&self, target: &Path, package: &str) -> Result<VersionInfo>;
}

impl<P: VersionProbe + ?Sized> VersionProbe for &P {
    fn package_version(&self, target: &Path, package: &str) -> Result<VersionInfo> {
        (**self).package_version(target, package)
    }
}

impl<P: VersionProbe + ?Sized> VersionProbe for Box<P> {
    fn package_version(&self, target: &Path, package: &str) -> Result<VersionInfo> {
        (**self).package_version(target, package)
    }
}
