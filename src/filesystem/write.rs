// src/filesystem/write.rs

//! File writing helpers for the target root
//!
//! Content is staged in a temporary file next to the destination and
//! renamed into place, so an init hook firing mid-install never sees a
//! half-written script.

use crate::error::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Mode for plain configuration files
pub const CONFIG_MODE: u32 = 0o644;

/// Mode for scripts that the init system executes
pub const EXEC_MODE: u32 = 0o755;

/// Write `content` to `path` atomically with the given permissions
///
/// Parent directories are created as needed. Any failure is reported as
/// `Error::WriteError` carrying the destination path.
pub fn write_file_atomic(path: &Path, content: &[u8], mode: u32) -> Result<()> {
    let wrap = |source: std::io::Error| Error::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let parent = path.parent().ok_or_else(|| {
        Error::InvalidPath(format!("{} has no parent directory", path.display()))
    })?;
    fs::create_dir_all(parent).map_err(wrap)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".netseed-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(wrap)?;
    staged.write_all(content).map_err(wrap)?;
    staged.as_file().sync_all().map_err(wrap)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(staged.path(), fs::Permissions::from_mode(mode)).map_err(wrap)?;
    }

    staged.persist(path).map_err(|e| wrap(e.error))?;

    debug!("Wrote {} ({} bytes, mode {:o})", path.display(), content.len(), mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parents() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("etc/network/if-up.d/hook");

        write_file_atomic(&path, b"#!/bin/sh\nexit 0\n", EXEC_MODE).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "#!/bin/sh\nexit 0\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_sets_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().unwrap();
        let script = temp.path().join("script");
        let config = temp.path().join("config");

        write_file_atomic(&script, b"x", EXEC_MODE).unwrap();
        write_file_atomic(&config, b"x", CONFIG_MODE).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&script), 0o755);
        assert_eq!(mode(&config), 0o644);
    }

    #[test]
    fn test_write_overwrites_and_leaves_no_staging_files() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("file");

        write_file_atomic(&path, b"first", CONFIG_MODE).unwrap();
        write_file_atomic(&path, b"second", CONFIG_MODE).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_error_reports_path() {
        let temp = tempfile::tempdir().unwrap();
        // A regular file where a directory is expected
        fs::write(temp.path().join("etc"), "not a dir").unwrap();
        let path = temp.path().join("etc/network/hook");

        let err = write_file_atomic(&path, b"x", EXEC_MODE).unwrap_err();
        match err {
            Error::WriteError { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
