//! Update-check worker for hot-pushed application content.
//!
//! This crate compares the installed content config against the one
//! published on the server:
//! - Installed config loading from a content root.
//! - Remote config fetching over HTTP.
//! - The check run itself, which yields exactly one [`CheckResult`].
//! - Reporting hooks for delivering that result.

mod checker;
mod error;
mod fetcher;
mod local;
mod observer;
mod report;

use std::path::Path;

/// Orchestrator and its per-run inputs.
pub use checker::{UpdateChecker, UpdateRequest};
/// Collaborator error types, kept for diagnostics.
pub use error::{FetchError, FetchStage, LocalConfigError};
/// Remote config transport.
pub use fetcher::{
    ConfigFetcher, HttpConfigFetcher, MAX_CONFIG_BYTES, RequestHeaders, build_client,
};
/// Installed config storage.
pub use local::{FileConfigProvider, LocalConfigProvider};
/// Run progress hooks.
pub use observer::{CheckObserver, CheckState, LogObserver};
/// Terminal result model and reporters.
pub use report::{
    ChannelReporter, CheckFailure, CheckResult, ErrorKind, ResultReporter, UPDATE_CHECKED_EVENT,
    UPDATE_LOAD_FAILED_EVENT,
};

pub use hotpush_config::{CheckOutcome, UpdatePolicy, VersionedConfig};

/// Check whether the server publishes content newer than what is installed
/// under `content_root`.
///
/// Failures are returned as [`CheckResult::Failure`]; this never errors.
pub async fn run_update_check(
    client: &reqwest::Client,
    config_url: &str,
    host_native_version: u32,
    content_root: &Path,
    headers: &RequestHeaders,
) -> CheckResult {
    let request = UpdateRequest {
        config_url: config_url.to_string(),
        host_native_version,
        content_root: content_root.to_path_buf(),
        headers: headers.clone(),
    };

    UpdateChecker::new(FileConfigProvider, HttpConfigFetcher::new(client.clone()))
        .run(&request)
        .await
}
