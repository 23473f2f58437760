//! Per-user hive access - root resolution and permission checks.

use crate::diagnostics::DiagnosticSink;
use crate::error::{Result, UserHiveError};
use crate::os;
use crate::process::{self, IntegrityLevel};
use winreg::enums::{HKEY_CURRENT_USER, HKEY_USERS, KEY_READ, KEY_WRITE};
use winreg::RegKey;

/// Root of the registry hive holding a user's settings.
///
/// Wraps `HKEY_CURRENT_USER` for the interactive user, or a hive loaded
/// under `HKEY_USERS` when an explicit user SID is supplied - the only
/// way to reach per-user state from the SYSTEM account.
pub struct UserKey {
    root: RegKey,
}

impl UserKey {
    /// Hive root of the currently logged-in user.
    #[must_use]
    pub fn current_user() -> Self {
        Self {
            root: RegKey::predef(HKEY_CURRENT_USER),
        }
    }

    /// Open the hive of the user identified by `sid` under `HKEY_USERS`.
    ///
    /// # Errors
    ///
    /// Returns error if no hive is loaded for that SID or it cannot be
    /// opened for reading and writing.
    pub fn for_sid(sid: &str) -> Result<Self> {
        let root = RegKey::predef(HKEY_USERS)
            .open_subkey_with_flags(sid, KEY_READ | KEY_WRITE)
            .map_err(|e| UserHiveError::HiveOpenFailed(format!("{sid}: {e}")))?;
        Ok(Self { root })
    }

    /// Resolve the hive root for `sid`, falling back to the current user
    /// when none is given.
    ///
    /// # Errors
    ///
    /// Returns error if a SID is given and its hive cannot be opened.
    pub fn open(sid: Option<&str>) -> Result<Self> {
        match sid {
            Some(sid) => Self::for_sid(sid),
            None => Ok(Self::current_user()),
        }
    }

    /// Borrow the hive root for use with the string-value helpers. The
    /// handle stays owned by this `UserKey`.
    #[must_use]
    pub fn key(&self) -> &RegKey {
        &self.root
    }
}

/// Check whether the current process may read, and optionally write,
/// the per-user hive.
///
/// The hive root itself is never opened; read access is probed through
/// the always-present `Software` subkey so that hive redirection set up
/// by tests keeps working. A failed probe is reported to `diag` but
/// does not by itself deny access - only the SYSTEM-account and
/// write-integrity checks do.
#[must_use]
pub fn has_access(write_access: bool, diag: &dyn DiagnosticSink) -> bool {
    let hive_readable = RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey_with_flags("Software", KEY_READ)
        .is_ok();

    check_access(
        hive_readable,
        process::is_running_as_system(),
        write_access,
        os::enforces_integrity_levels(),
        process::integrity_level,
        diag,
    )
}

fn check_access(
    hive_readable: bool,
    running_as_system: bool,
    write_access: bool,
    integrity_enforced: bool,
    integrity: impl FnOnce() -> Result<IntegrityLevel>,
    diag: &dyn DiagnosticSink,
) -> bool {
    if !hive_readable {
        diag.report("has_access: could not open the per-user hive for reading");
    }

    if running_as_system {
        diag.report("has_access: no per-user hive access as SYSTEM without a user SID");
        return false;
    }

    if write_access && integrity_enforced {
        match integrity() {
            Err(_) => {
                diag.report("has_access: cannot determine the process integrity level");
                return false;
            }
            Ok(level) if level <= IntegrityLevel::Low => {
                diag.report("has_access: cannot write to the per-user hive from low integrity");
                return false;
            }
            Ok(_) => {}
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSink {
        messages: RefCell<Vec<String>>,
    }

    impl DiagnosticSink for RecordingSink {
        fn report(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    fn medium() -> Result<IntegrityLevel> {
        Ok(IntegrityLevel::Medium)
    }

    #[test]
    fn read_access_for_normal_user() {
        let sink = RecordingSink::default();
        assert!(check_access(true, false, false, true, medium, &sink));
        assert!(sink.messages.borrow().is_empty());
    }

    #[test]
    fn failed_hive_probe_reports_but_does_not_deny() {
        let sink = RecordingSink::default();
        assert!(check_access(false, false, true, true, medium, &sink));
        assert_eq!(sink.messages.borrow().len(), 1);
    }

    #[test]
    fn system_account_is_denied() {
        let sink = RecordingSink::default();
        assert!(!check_access(true, true, false, true, medium, &sink));
        assert_eq!(sink.messages.borrow().len(), 1);
    }

    #[test]
    fn write_access_granted_where_integrity_levels_do_not_exist() {
        let sink = RecordingSink::default();
        let level = || Ok(IntegrityLevel::Untrusted);
        assert!(check_access(true, false, true, false, level, &sink));
        assert!(sink.messages.borrow().is_empty());
    }

    #[test]
    fn failed_integrity_query_denies_write() {
        let sink = RecordingSink::default();
        let level = || Err(UserHiveError::IntegrityQueryFailed("no token".to_string()));
        assert!(!check_access(true, false, true, true, level, &sink));
        assert_eq!(sink.messages.borrow().len(), 1);
    }

    #[test]
    fn low_integrity_denies_write() {
        let sink = RecordingSink::default();
        let level = || Ok(IntegrityLevel::Low);
        assert!(!check_access(true, false, true, true, level, &sink));
        assert_eq!(sink.messages.borrow().len(), 1);
    }

    #[test]
    fn untrusted_integrity_denies_write() {
        let sink = RecordingSink::default();
        let level = || Ok(IntegrityLevel::Untrusted);
        assert!(!check_access(true, false, true, true, level, &sink));
    }

    #[test]
    fn medium_and_above_allow_write() {
        for level in [
            IntegrityLevel::Medium,
            IntegrityLevel::High,
            IntegrityLevel::System,
        ] {
            let sink = RecordingSink::default();
            assert!(check_access(true, false, true, true, move || Ok(level), &sink));
            assert!(sink.messages.borrow().is_empty());
        }
    }

    #[test]
    fn integrity_is_not_queried_for_read_only_access() {
        let sink = RecordingSink::default();
        let level = || -> Result<IntegrityLevel> {
            unreachable!("read-only check must not query integrity")
        };
        assert!(check_access(true, false, false, true, level, &sink));
    }
}
