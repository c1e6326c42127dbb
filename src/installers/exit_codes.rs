// src/installers/exit_codes.rs

//! Exit code classification
//!
//! Classification is total: every code maps to exactly one outcome.

use super::{InstallDirection, InstallerProfile};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// ERROR_SUCCESS_REBOOT_INITIATED
pub const REBOOT_INITIATED: i64 = 1641;

/// ERROR_SUCCESS_REBOOT_REQUIRED
pub const REBOOT_REQUIRED: i64 = 3010;

/// ERROR_SUCCESS_RESTART_REQUIRED
pub const RESTART_REQUIRED: i64 = 3011;

/// Platform codes meaning "succeeded, reboot needed to finish"
pub const REBOOT_PENDING_EXIT_CODES: [i64; 3] = [REBOOT_INITIATED, REBOOT_REQUIRED, RESTART_REQUIRED];

/// Outcome of an installer run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExitCodeOutcome {
    Success,
    SuccessRebootRequired,
    Error,
}

impl ExitCodeOutcome {
    /// Both success variants count as success
    pub fn is_success(self) -> bool {
        !matches!(self, ExitCodeOutcome::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExitCodeOutcome::Success => "success",
            ExitCodeOutcome::SuccessRebootRequired => "success-reboot-required",
            ExitCodeOutcome::Error => "error",
        }
    }
}

impl fmt::Display for ExitCodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether `code` is one of the built-in reboot-pending codes
pub fn is_reboot_pending(code: i64) -> bool {
    REBOOT_PENDING_EXIT_CODES.contains(&code)
}

/// Classify a raw exit code for the given profile and direction
///
/// Reboot-pending codes win over the profile's valid set so that a profile
/// listing 3010 as valid still reports the pending reboot.
pub fn classify(profile: &InstallerProfile, direction: InstallDirection, code: i64) -> ExitCodeOutcome {
    let outcome = if code == 0 {
        ExitCodeOutcome::Success
    } else if is_reboot_pending(code) {
        ExitCodeOutcome::SuccessRebootRequired
    } else if profile.valid_exit_codes(direction).contains(&code) {
        ExitCodeOutcome::Success
    } else {
        ExitCodeOutcome::Error
    };

    debug!(
        "Classified {} exit code {} for {} installer as {}",
        direction,
        code,
        profile.installer_type(),
        outcome
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::installers::InstallerType;

    fn profile() -> InstallerProfile {
        InstallerProfile::builder(InstallerType::Nsis)
            .install_executable("setup.exe")
            .valid_install_exit_codes([2])
            .valid_uninstall_exit_codes([5])
            .build()
    }

    #[test]
    fn test_zero_is_always_success() {
        let p = InstallerProfile::builder(InstallerType::Custom).build();
        assert_eq!(classify(&p, InstallDirection::Install, 0), ExitCodeOutcome::Success);
        assert_eq!(classify(&p, InstallDirection::Uninstall, 0), ExitCodeOutcome::Success);
    }

    #[test]
    fn test_direction_selects_valid_set() {
        let p = profile();
        assert_eq!(classify(&p, InstallDirection::Install, 2), ExitCodeOutcome::Success);
        assert_eq!(classify(&p, InstallDirection::Uninstall, 2), ExitCodeOutcome::Error);
        assert_eq!(classify(&p, InstallDirection::Uninstall, 5), ExitCodeOutcome::Success);
        assert_eq!(classify(&p, InstallDirection::Install, 5), ExitCodeOutcome::Error);
    }

    #[test]
    fn test_reboot_codes_override_valid_set() {
        let p = InstallerProfile::builder(InstallerType::Msi)
            .install_executable("msiexec.exe")
            .valid_install_exit_codes([3010, 1641])
            .build();
        assert_eq!(
            classify(&p, InstallDirection::Install, 3010),
            ExitCodeOutcome::SuccessRebootRequired
        );
        assert_eq!(
            classify(&profile(), InstallDirection::Uninstall, 1641),
            ExitCodeOutcome::SuccessRebootRequired
        );
    }

    #[test]
    fn test_unknown_codes_are_errors() {
        let p = profile();
        assert_eq!(classify(&p, InstallDirection::Install, 1), ExitCodeOutcome::Error);
        assert_eq!(classify(&p, InstallDirection::Install, -1), ExitCodeOutcome::Error);
        assert!(!ExitCodeOutcome::Error.is_success());
        assert!(ExitCodeOutcome::SuccessRebootRequired.is_success());
    }
}
