// src/compat.rs

//! Target compatibility decisions
//!
//! ifupdown releases before 0.8.6 wait 120 seconds on boot unless alias
//! interfaces are brought up from the base interface's `post-up` lines.
//! Detection looks at the ifupdown version installed in the target.

use crate::packages::VersionProbe;
use crate::report::Reporter;
use crate::version::VersionInfo;
use std::path::Path;
use tracing::{debug, info};

/// Package whose version gates the postup alias behaviour
pub const IFUPDOWN_PACKAGE: &str = "ifupdown";

/// First ifupdown release that no longer needs postup aliases
pub const POSTUP_ALIAS_THRESHOLD: (u64, u64, u64) = (0, 8, 6);

/// Decide whether the target needs postup aliases
///
/// Returns `true` only when the installed ifupdown is known to be older
/// than the threshold. Any probe failure is reported as a warning and means
/// modern behaviour (`false`).
pub fn detect_postup_alias(
    target: &Path,
    probe: &dyn VersionProbe,
    reporter: &dyn Reporter,
) -> bool {
    info!("Checking target for version of {} package", IFUPDOWN_PACKAGE);

    let version = match probe.package_version(target, IFUPDOWN_PACKAGE) {
        Ok(version) => version,
        Err(e) => {
            reporter.warning(&format!(
                "Failed reading {} package version (using defaults): {}",
                IFUPDOWN_PACKAGE, e
            ));
            return false;
        }
    };

    debug!(
        "{} version is {} (major={} minor={} micro={} semantic={})",
        IFUPDOWN_PACKAGE,
        version.raw,
        version.major,
        version.minor,
        version.micro,
        version.semantic
    );

    let (major, minor, micro) = POSTUP_ALIAS_THRESHOLD;
    version.is_older_than(&VersionInfo::new(major, minor, micro))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::report::{CallbackReporter, ReportEvent, SilentReporter};
    use std::cell::{Cell, RefCell};

    struct FixedProbe(&'static str);

    impl VersionProbe for FixedProbe {
        fn package_version(&self, _target: &Path, package: &str) -> Result<VersionInfo> {
            assert_eq!(package, IFUPDOWN_PACKAGE);
            VersionInfo::parse_dpkg(self.0)
        }
    }

    struct FailingProbe {
        calls: Cell<u32>,
    }

    impl VersionProbe for FailingProbe {
        fn package_version(&self, _target: &Path, _package: &str) -> Result<VersionInfo> {
            self.calls.set(self.calls.get() + 1);
            Err(Error::ProbeUnavailable("no dpkg database".to_string()))
        }
    }

    #[test]
    fn test_old_ifupdown_needs_alias() {
        let target = Path::new("/nonexistent");
        assert!(detect_postup_alias(
            target,
            &FixedProbe("0.7.47.2ubuntu4.4"),
            &SilentReporter
        ));
        assert!(detect_postup_alias(target, &FixedProbe("0.8.5"), &SilentReporter));
    }

    #[test]
    fn test_modern_ifupdown_needs_no_alias() {
        let target = Path::new("/nonexistent");
        assert!(!detect_postup_alias(target, &FixedProbe("0.8.6"), &SilentReporter));
        assert!(!detect_postup_alias(target, &FixedProbe("0.8.10ubuntu1"), &SilentReporter));
        assert!(!detect_postup_alias(target, &FixedProbe("0.8.35ubuntu1"), &SilentReporter));
    }

    #[test]
    fn test_probe_failure_defaults_to_false() {
        let events = RefCell::new(Vec::new());
        let reporter = CallbackReporter::new(|e| events.borrow_mut().push(e));
        let probe = FailingProbe { calls: Cell::new(0) };

        assert!(!detect_postup_alias(Path::new("/nonexistent"), &probe, &reporter));
        assert_eq!(probe.calls.get(), 1);

        let events = events.borrow();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            ReportEvent::Warning(message) if message.contains("no dpkg database")
        ));
    }

    #[test]
    fn test_unparseable_version_defaults_to_false() {
        let target = Path::new("/nonexistent");
        assert!(!detect_postup_alias(target, &FixedProbe("unknown"), &SilentReporter));
    }
}
