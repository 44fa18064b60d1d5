// src/report.rs

//! Reporting interface for target reconciliation
//!
//! Core routines never log through a global; they report what they did to
//! a `Reporter` handed in by the caller. Implementations include:
//! - `LogReporter`: forwards to tracing at the level each event warrants
//! - `SilentReporter`: no-op for tests and embedding
//! - `CallbackReporter`: hands a `ReportEvent` to a closure
//!
//! # Example
//!
//! ```
//! use netseed::report::{CallbackReporter, ReportEvent, Reporter};
//! use std::sync::Mutex;
//!
//! let seen = Mutex::new(Vec::new());
//! let reporter = CallbackReporter::new(|event: ReportEvent| seen.lock().unwrap().push(event));
//! reporter.warning("no ifupdown package in target");
//! assert_eq!(seen.lock().unwrap().len(), 1);
//! ```

use crate::reconcile::ReconciliationOutcome;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Receives the decisions made while patching a target root
pub trait Reporter {
    /// A legacy artifact was inspected; `detail` explains the decision
    fn reconciled(&self, path: &Path, outcome: ReconciliationOutcome, detail: &str);

    /// Something went wrong that does not change the outcome
    fn failure(&self, path: &Path, message: &str);

    /// A hook script was written
    fn hook_installed(&self, path: &Path);

    /// A general warning
    fn warning(&self, message: &str);
}

/// Events emitted by `CallbackReporter`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    Reconciled {
        path: PathBuf,
        outcome: ReconciliationOutcome,
        detail: String,
    },
    Failure {
        path: PathBuf,
        message: String,
    },
    HookInstalled(PathBuf),
    Warning(String),
}

/// Silent reporter (no-op)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn reconciled(&self, _path: &Path, _outcome: ReconciliationOutcome, _detail: &str) {}

    fn failure(&self, _path: &Path, _message: &str) {}

    fn hook_installed(&self, _path: &Path) {}

    fn warning(&self, _message: &str) {}
}

/// Logging reporter
///
/// A missing legacy file is a warning, an unreadable one an error, and
/// every other outcome is informational.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn reconciled(&self, path: &Path, outcome: ReconciliationOutcome, detail: &str) {
        match outcome {
            ReconciliationOutcome::Absent => {
                warn!("{}: {} ({})", path.display(), detail, outcome)
            }
            ReconciliationOutcome::Unreadable => {
                error!("{}: {} ({})", path.display(), detail, outcome)
            }
            _ => info!("{}: {} ({})", path.display(), detail, outcome),
        }
    }

    fn failure(&self, path: &Path, message: &str) {
        error!("{}: {}", path.display(), message);
    }

    fn hook_installed(&self, path: &Path) {
        info!("Installed hook script: {}", path.display());
    }

    fn warning(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Callback-based reporter
pub struct CallbackReporter<F>
where
    F: Fn(ReportEvent),
{
    callback: F,
}

impl<F> CallbackReporter<F>
where
    F: Fn(ReportEvent),
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Reporter for CallbackReporter<F>
where
    F: Fn(ReportEvent),
{
    fn reconciled(&self, path: &Path, outcome: ReconciliationOutcome, detail: &str) {
        (self.callback)(ReportEvent::Reconciled {
            path: path.to_path_buf(),
            outcome,
            detail: detail.to_string(),
        });
    }

    fn failure(&self, path: &Path, message: &str) {
        (self.callback)(ReportEvent::Failure {
            path: path.to_path_buf(),
            message: message.to_string(),
        });
    }

    fn hook_installed(&self, path: &Path) {
        (self.callback)(ReportEvent::HookInstalled(path.to_path_buf()));
    }

    fn warning(&self, message: &str) {
        (self.callback)(ReportEvent::Warning(message.to_string()));
    }
}
