use serde::Serialize;
use std::fmt;

/// Result of comparing an installed release against a remote one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckOutcome {
    #[serde(rename = "none")]
    NoUpdateAvailable,
    #[serde(rename = "available")]
    UpdateAvailable,
    #[serde(rename = "incompatible")]
    UpdateAvailableButIncompatible,
}

impl CheckOutcome {
    /// Numeric result code used by the legacy `chcp_updatechecked` event.
    #[must_use]
    pub fn legacy_code(self) -> u8 {
        match self {
            Self::NoUpdateAvailable => 0,
            Self::UpdateAvailable => 1,
            Self::UpdateAvailableButIncompatible => 2,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoUpdateAvailable => write!(f, "none"),
            Self::UpdateAvailable => write!(f, "available"),
            Self::UpdateAvailableButIncompatible => write!(f, "incompatible"),
        }
    }
}

/// Classify a remote release relative to the installed one.
///
/// Release versions are opaque and compared by string equality only. A
/// matching release is always `NoUpdateAvailable`, whatever its native
/// requirement: that content is already installed.
#[must_use]
pub fn classify(
    local_release: &str,
    remote_release: &str,
    remote_minimum_native: u32,
    host_native_version: u32,
) -> CheckOutcome {
    if remote_release == local_release {
        CheckOutcome::NoUpdateAvailable
    } else if host_native_version >= remote_minimum_native {
        CheckOutcome::UpdateAvailable
    } else {
        CheckOutcome::UpdateAvailableButIncompatible
    }
}
