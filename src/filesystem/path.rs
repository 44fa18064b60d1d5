// src/filesystem/path.rs

//! Path handling for files inside the target root
//!
//! Every file netseed touches is addressed relative to the target root.
//! These helpers turn such a relative path into a location under the root
//! and refuse anything that could land outside of it.

use crate::error::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// Normalize a target-relative path
///
/// Unlike a lenient sanitizer, leading slashes are an error here: a caller
/// passing `/etc/...` almost certainly meant the host file, not the one in
/// the target.
///
/// 1. Rejects paths starting with `/` (`InvalidPath`)
/// 2. Rejects `..` components (`PathTraversal`)
/// 3. Skips `.` components
/// 4. Rejects paths that normalize to nothing
///
/// # Examples
///
/// ```
/// use netseed::filesystem::path::normalize_relative;
/// use std::path::PathBuf;
///
/// assert_eq!(
///     normalize_relative("etc/./network/interfaces").unwrap(),
///     PathBuf::from("etc/network/interfaces")
/// );
/// assert!(normalize_relative("/etc/network/interfaces").is_err());
/// assert!(normalize_relative("etc/../../passwd").is_err());
/// ```
pub fn normalize_relative(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if path_str.starts_with('/') {
        return Err(Error::InvalidPath(format!(
            "path must be relative to the target root: {}",
            path_str
        )));
    }

    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(c) => normalized.push(c),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(Error::PathTraversal(path_str.to_string()));
            }
            Component::Prefix(_) | Component::RootDir => {
                return Err(Error::InvalidPath(path_str.to_string()));
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(Error::InvalidPath("Empty path after normalization".to_string()));
    }

    Ok(normalized)
}

/// Join a target root with a target-relative path
///
/// # Examples
///
/// ```
/// use netseed::filesystem::path::target_path;
/// use std::path::{Path, PathBuf};
///
/// let root = Path::new("/tmp/target");
/// assert_eq!(
///     target_path(root, "etc/sysctl.d/10-ipv6-privacy.conf").unwrap(),
///     PathBuf::from("/tmp/target/etc/sysctl.d/10-ipv6-privacy.conf")
/// );
/// assert!(target_path(root, "../etc/passwd").is_err());
/// ```
pub fn target_path(root: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<PathBuf> {
    let root = root.as_ref();
    let relative = normalize_relative(path)?;
    let joined = root.join(&relative);

    // Catches symlinked parents pointing outside the root on existing paths
    if let (Ok(canonical_root), Ok(canonical_joined)) =
        (root.canonicalize(), joined.canonicalize())
        && !canonical_joined.starts_with(&canonical_root)
    {
        return Err(Error::PathTraversal(format!(
            "Path {} escapes root {}",
            joined.display(),
            root.display()
        )));
    }

    Ok(joined)
}
