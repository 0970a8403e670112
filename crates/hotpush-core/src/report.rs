use hotpush_config::{CheckOutcome, VersionedConfig, to_document_value};
use log::debug;
use serde::{Serialize, Serializer};
use serde_json::json;
use tokio::sync::mpsc;

/// Legacy event name for a completed check.
pub const UPDATE_CHECKED_EVENT: &str = "chcp_updatechecked";
/// Legacy event name for a failed check.
pub const UPDATE_LOAD_FAILED_EVENT: &str = "chcp_updateLoadFailed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    LocalConfigMissing,
    RemoteFetchFailed,
    RemoteConfigInvalid,
}

impl ErrorKind {
    /// Error code used by the legacy event protocol.
    #[must_use]
    pub fn legacy_code(self) -> i32 {
        match self {
            Self::RemoteFetchFailed => -1,
            Self::LocalConfigMissing => -9,
            Self::RemoteConfigInvalid => -19,
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::LocalConfigMissing => "Failed to load the installed application config",
            Self::RemoteFetchFailed => "Failed to download the application config",
            Self::RemoteConfigInvalid => "Downloaded application config is invalid",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// A terminal failure of one check run.
///
/// Only [`ErrorKind::RemoteConfigInvalid`] keeps the config that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckFailure {
    kind: ErrorKind,
    partial_config: Option<VersionedConfig>,
    detail: String,
}

impl CheckFailure {
    pub(crate) fn local_config_missing(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::LocalConfigMissing,
            partial_config: None,
            detail: detail.into(),
        }
    }

    pub(crate) fn remote_fetch_failed(detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::RemoteFetchFailed,
            partial_config: None,
            detail: detail.into(),
        }
    }

    pub(crate) fn remote_config_invalid(config: VersionedConfig, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::RemoteConfigInvalid,
            partial_config: Some(config),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[must_use]
    pub fn partial_config(&self) -> Option<&VersionedConfig> {
        self.partial_config.as_ref()
    }

    /// Diagnostic message from the collaborator that failed.
    #[must_use]
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Terminal output of one update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Success {
        remote_config: VersionedConfig,
        outcome: CheckOutcome,
    },
    Failure(CheckFailure),
}

impl CheckResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub fn outcome(&self) -> Option<CheckOutcome> {
        match self {
            Self::Success { outcome, .. } => Some(*outcome),
            Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure.kind),
        }
    }

    #[must_use]
    pub fn remote_config(&self) -> Option<&VersionedConfig> {
        match self {
            Self::Success { remote_config, .. } => Some(remote_config),
            Self::Failure(failure) => failure.partial_config(),
        }
    }

    #[must_use]
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Success { .. } => UPDATE_CHECKED_EVENT,
            Self::Failure(_) => UPDATE_LOAD_FAILED_EVENT,
        }
    }

    /// Render the result as an event of the legacy bridge protocol.
    #[must_use]
    pub fn legacy_event(&self) -> serde_json::Value {
        match self {
            Self::Success {
                remote_config,
                outcome,
            } => json!({
                "action": self.event_name(),
                "data": {
                    "config": to_document_value(remote_config),
                    "result": outcome.legacy_code(),
                },
            }),
            Self::Failure(failure) => json!({
                "action": self.event_name(),
                "error": {
                    "code": failure.kind.legacy_code(),
                    "description": failure.kind.description(),
                },
                "data": {
                    "config": failure.partial_config().map(to_document_value),
                },
            }),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultShape<'a> {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<CheckOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_config: Option<&'a VersionedConfig>,
}

impl Serialize for CheckResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let shape = ResultShape {
            kind: if self.is_success() {
                "success"
            } else {
                "failure"
            },
            error_kind: self.error_kind(),
            outcome: self.outcome(),
            remote_config: self.remote_config(),
        };
        shape.serialize(serializer)
    }
}

/// Receives the terminal result of a run, once per run.
pub trait ResultReporter: Send + Sync {
    fn report(&self, result: &CheckResult);
}

impl<F> ResultReporter for F
where
    F: Fn(&CheckResult) + Send + Sync,
{
    fn report(&self, result: &CheckResult) {
        self(result);
    }
}

/// Forwards results into a channel for consumers on another task.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: mpsc::UnboundedSender<CheckResult>,
}

impl ChannelReporter {
    #[must_use]
    pub fn new(sender: mpsc::UnboundedSender<CheckResult>) -> Self {
        Self { sender }
    }

    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<CheckResult>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::new(sender), receiver)
    }
}

impl ResultReporter for ChannelReporter {
    fn report(&self, result: &CheckResult) {
        if self.sender.send(result.clone()).is_err() {
            debug!("Update check result dropped, receiver is closed");
        }
    }
}
