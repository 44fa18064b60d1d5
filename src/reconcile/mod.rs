// src/reconcile/mod.rs

//! Reconciliation of distro-shipped legacy configuration
//!
//! Cloud and server images ship configuration files that fight with the
//! freshly rendered network configuration. A file is only touched when its
//! content is byte-for-byte what the image shipped (ignoring comment lines
//! and surrounding whitespace); anything else is treated as user content
//! and left alone.
//!
//! The algorithm is written once and parameterized by `LegacyArtifactSpec`.
//! Call sites supply data only; see `known` for the artifacts netseed
//! handles.

pub mod known;

use crate::error::{Error, Result};
use crate::filesystem::{target_path, write_file_atomic, CONFIG_MODE};
use crate::report::Reporter;
use std::fmt;
use std::fs;
use std::path::Path;

pub use known::{
    ETH0_LEGACY_CONFIG, IPV6_PRIVACY_ANNOTATION, IPV6_PRIVACY_CONFIG, LEGACY_ARTIFACTS,
};

/// What to do with a file whose content matches the expected signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPolicy<'a> {
    /// Remove the file
    Delete,
    /// Remove the file and leave this text in its place
    DeleteAndAnnotate(&'a str),
}

/// A known legacy file and the policy applied when it is found unmodified
///
/// A mismatch always preserves the file and a missing file is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyArtifactSpec<'a> {
    /// Path relative to the target root (must not start with `/`)
    pub path: &'a str,
    /// Content lines as shipped, after comment stripping and trimming
    pub expected_lines: &'a [&'a str],
    pub on_match: MatchPolicy<'a>,
    /// What is at stake if the file stays, used in reports
    pub consequence: &'a str,
}

/// Result of reconciling one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReconciliationOutcome {
    /// Known content, file deleted
    Removed,
    /// Known content, file replaced by an annotation
    RemovedAndAnnotated,
    /// User content, file untouched
    Preserved,
    /// No such file in the target
    Absent,
    /// File exists but could not be read; untouched
    Unreadable,
}

impl fmt::Display for ReconciliationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReconciliationOutcome::Removed => "removed",
            ReconciliationOutcome::RemovedAndAnnotated => "removed and annotated",
            ReconciliationOutcome::Preserved => "preserved",
            ReconciliationOutcome::Absent => "absent",
            ReconciliationOutcome::Unreadable => "unreadable",
        };
        f.write_str(s)
    }
}

/// Extract the lines that carry configuration
///
/// Lines beginning with `#` are dropped as written (before trimming), the
/// rest are trimmed and kept in order. Blank lines survive as empty
/// strings.
pub fn content_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .collect()
}

/// Inspect one legacy artifact in `target` and apply its policy
///
/// Returns an error only for an unusable `spec.path` or when removing a
/// matching file fails. Everything else, including unreadable files, is an
/// outcome.
pub fn reconcile(
    target: &Path,
    spec: &LegacyArtifactSpec<'_>,
    reporter: &dyn Reporter,
) -> Result<ReconciliationOutcome> {
    reconcile_with(target, spec, reporter, |path, text| {
        write_file_atomic(path, text, CONFIG_MODE)
    })
}

fn reconcile_with<W>(
    target: &Path,
    spec: &LegacyArtifactSpec<'_>,
    reporter: &dyn Reporter,
    write_annotation: W,
) -> Result<ReconciliationOutcome>
where
    W: Fn(&Path, &[u8]) -> Result<()>,
{
    let path = target_path(target, spec.path)?;

    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            let outcome = ReconciliationOutcome::Absent;
            reporter.reconciled(&path, outcome, "legacy config file not found");
            return Ok(outcome);
        }
        Err(e) => {
            let outcome = ReconciliationOutcome::Unreadable;
            reporter.reconciled(
                &path,
                outcome,
                &format!("{} File could not be inspected: {}", spec.consequence, e),
            );
            return Ok(outcome);
        }
    }

    let content = match fs::read(&path)
        .and_then(|bytes| {
            String::from_utf8(bytes)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        }) {
        Ok(content) => content,
        Err(e) => {
            let outcome = ReconciliationOutcome::Unreadable;
            reporter.reconciled(
                &path,
                outcome,
                &format!("{} File exists, but could not be read: {}", spec.consequence, e),
            );
            return Ok(outcome);
        }
    };

    if content_lines(&content).as_slice() != spec.expected_lines {
        let outcome = ReconciliationOutcome::Preserved;
        reporter.reconciled(
            &path,
            outcome,
            &format!(
                "{} File exists with user configured content, leaving it in place.",
                spec.consequence
            ),
        );
        return Ok(outcome);
    }

    fs::remove_file(&path).map_err(|e| {
        Error::IoError(format!("Failed to remove {}: {}", path.display(), e))
    })?;

    let outcome = match spec.on_match {
        MatchPolicy::Delete => ReconciliationOutcome::Removed,
        MatchPolicy::DeleteAndAnnotate(text) => {
            // The file is already gone, which is an acceptable end state
            if let Err(e) = write_annotation(&path, text.as_bytes()) {
                reporter.failure(&path, &format!("Failed to write annotation: {}", e));
            }
            ReconciliationOutcome::RemovedAndAnnotated
        }
    };

    reporter.reconciled(&path, outcome, "removed file with known contents");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CallbackReporter, ReportEvent, SilentReporter};
    use std::cell::RefCell;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const SPEC: LegacyArtifactSpec<'static> = LegacyArtifactSpec {
        path: "etc/example.d/known.conf",
        expected_lines: &["alpha = 1", "beta = 2"],
        on_match: MatchPolicy::Delete,
        consequence: "Example config may not apply.",
    };

    const ANNOTATE: LegacyArtifactSpec<'static> = LegacyArtifactSpec {
        on_match: MatchPolicy::DeleteAndAnnotate("# replaced\n"),
        ..SPEC
    };

    fn target_with(content: &[u8]) -> (TempDir, PathBuf) {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(SPEC.path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    fn test_content_lines() {
        let content = "# header\nalpha = 1  \n   beta = 2\n";
        assert_eq!(content_lines(content), vec!["alpha = 1", "beta = 2"]);
    }

    #[test]
    fn test_content_lines_indented_hash_is_content() {
        assert_eq!(content_lines("  # not a comment\n"), vec!["# not a comment"]);
    }

    #[test]
    fn test_content_lines_keeps_blank_lines() {
        assert_eq!(content_lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert!(content_lines("").is_empty());
    }

    #[test]
    fn test_absent() {
        let temp = tempfile::tempdir().unwrap();
        let outcome = reconcile(temp.path(), &SPEC, &SilentReporter).unwrap();
        assert_eq!(outcome, ReconciliationOutcome::Absent);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_match_delete() {
        let (temp, path) = target_with(b"# shipped by the image\nalpha = 1\nbeta = 2\n");
        let outcome = reconcile(temp.path(), &SPEC, &SilentReporter).unwrap();
        assert_eq!(outcome, ReconciliationOutcome::Removed);
        assert!(!path.exists());
    }

    #[test]
    fn test_match_with_whitespace_and_crlf() {
        let (temp, path) = target_with(b"  alpha = 1\t\r\nbeta = 2\r\n");
        let outcome = reconcile(temp.path(), &SPEC, &SilentReporter).unwrap();
        assert_eq!(outcome, ReconciliationOutcome::Removed);
        assert!(!path.exists());
    }

    #[test]
    fn test_match_annotate() {
        let (temp, path) = target_with(b"alpha = 1\nbeta = 2\n");
        let outcome = reconcile(temp.path(), &ANNOTATE, &SilentReporter).unwrap();
        assert_eq!(outcome, ReconciliationOutcome::RemovedAndAnnotated);
        assert_eq!(fs::read_to_string(&path).unwrap(), "# replaced\n");
    }

    #[test]
    fn test_mismatch_preserves_bytes() {
        let variants: [&[u8]; 4] = [
            b"alpha = 1\nbeta = 3\n",
            b"beta = 2\nalpha = 1\n",
            b"alpha = 1\n",
            b"alpha = 1\nbeta = 2\ngamma = 3\n",
        ];
        for content in variants {
            let (temp, path) = target_with(content);
            let outcome = reconcile(temp.path(), &ANNOTATE, &SilentReporter).unwrap();
            assert_eq!(outcome, ReconciliationOutcome::Preserved);
            assert_eq!(fs::read(&path).unwrap(), content);
        }
    }

    #[test]
    fn test_unreadable_invalid_utf8() {
        let (temp, path) = target_with(b"alpha = \xff\xfe\n");
        let outcome = reconcile(temp.path(), &SPEC, &SilentReporter).unwrap();
        assert_eq!(outcome, ReconciliationOutcome::Unreadable);
        assert_eq!(fs::read(&path).unwrap(), b"alpha = \xff\xfe\n");
    }

    #[test]
    fn test_unreadable_directory() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir_all(temp.path().join(SPEC.path)).unwrap();
        let outcome = reconcile(temp.path(), &SPEC, &SilentReporter).unwrap();
        assert_eq!(outcome, ReconciliationOutcome::Unreadable);
        assert!(temp.path().join(SPEC.path).is_dir());
    }

    #[test]
    fn test_uninspectable_path_is_unreadable() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(SPEC.path);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        // Self-referencing symlink: metadata fails with something other than NotFound
        std::os::unix::fs::symlink(&path, &path).unwrap();

        let outcome = reconcile(temp.path(), &SPEC, &SilentReporter).unwrap();

        assert_eq!(outcome, ReconciliationOutcome::Unreadable);
        assert!(fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
    }

    #[test]
    fn test_annotation_write_failure_keeps_outcome() {
        let events = RefCell::new(Vec::new());
        let reporter = CallbackReporter::new(|e| events.borrow_mut().push(e));
        let (temp, path) = target_with(b"alpha = 1\nbeta = 2\n");

        let outcome = reconcile_with(temp.path(), &ANNOTATE, &reporter, |p, _| {
            Err(Error::WriteError {
                path: p.to_path_buf(),
                source: std::io::Error::other("disk full"),
            })
        })
        .unwrap();

        assert_eq!(outcome, ReconciliationOutcome::RemovedAndAnnotated);
        assert!(!path.exists());
        let events = events.borrow();
        assert!(events.iter().any(|e| matches!(
            e,
            ReportEvent::Failure { path: p, message } if p == &path && message.contains("disk full")
        )));
        assert!(matches!(
            events.last(),
            Some(ReportEvent::Reconciled {
                outcome: ReconciliationOutcome::RemovedAndAnnotated,
                ..
            })
        ));
    }

    #[test]
    fn test_absolute_path_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let spec = LegacyArtifactSpec {
            path: "/etc/example.d/known.conf",
            ..SPEC
        };
        let err = reconcile(temp.path(), &spec, &SilentReporter).unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }

    #[test]
    fn test_idempotent() {
        for spec in [SPEC, ANNOTATE] {
            let (temp, path) = target_with(b"alpha = 1\nbeta = 2\n");
            reconcile(temp.path(), &spec, &SilentReporter).unwrap();
            let after_once = fs::read(&path).ok();

            let second = reconcile(temp.path(), &spec, &SilentReporter).unwrap();
            assert_eq!(fs::read(&path).ok(), after_once);
            assert!(matches!(
                second,
                ReconciliationOutcome::Absent | ReconciliationOutcome::Preserved
            ));
        }
    }

    #[test]
    fn test_reports_each_decision() {
        let events = RefCell::new(Vec::new());
        let reporter = CallbackReporter::new(|e| events.borrow_mut().push(e));
        let (temp, path) = target_with(b"alpha = 1\nbeta = 2\n");

        reconcile(temp.path(), &SPEC, &reporter).unwrap();
        reconcile(temp.path(), &SPEC, &reporter).unwrap();

        let outcomes: Vec<_> = events
            .borrow()
            .iter()
            .map(|e| match e {
                ReportEvent::Reconciled { path: p, outcome, .. } => {
                    assert_eq!(p, &path);
                    *outcome
                }
                other => panic!("unexpected event: {other:?}"),
            })
            .collect();
        assert_eq!(
            outcomes,
            vec![ReconciliationOutcome::Removed, ReconciliationOutcome::Absent]
        );
    }
}
