use std::fmt;

use hotpush_config::VersionedConfig;
use log::{debug, info, warn};

use crate::report::CheckResult;

/// Step of a single update-check run. Runs only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckState {
    Init,
    LoadingLocal,
    FetchingRemote,
    Classifying,
    Done,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::LoadingLocal => write!(f, "loading local config"),
            Self::FetchingRemote => write!(f, "fetching remote config"),
            Self::Classifying => write!(f, "classifying"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Hooks invoked while a check runs. All methods default to no-ops.
pub trait CheckObserver: Send + Sync {
    fn on_transition(&self, _from: CheckState, _to: CheckState) {}

    fn on_local_loaded(&self, _config: &VersionedConfig) {}

    fn on_remote_fetched(&self, _config: &VersionedConfig) {}

    fn on_finished(&self, _result: &CheckResult) {}
}

/// Observer that writes run progress to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl CheckObserver for LogObserver {
    fn on_transition(&self, from: CheckState, to: CheckState) {
        debug!("Update check: {from} -> {to}");
    }

    fn on_local_loaded(&self, config: &VersionedConfig) {
        debug!("Installed content: {config}");
    }

    fn on_remote_fetched(&self, config: &VersionedConfig) {
        debug!("Remote content: {config}");
    }

    fn on_finished(&self, result: &CheckResult) {
        match result {
            CheckResult::Success {
                remote_config,
                outcome,
            } => info!(
                "Update check finished: {outcome} (release {})",
                remote_config.release_version()
            ),
            CheckResult::Failure(failure) => {
                warn!("Update check failed: {}: {}", failure.kind(), failure.detail());
            }
        }
    }
}
