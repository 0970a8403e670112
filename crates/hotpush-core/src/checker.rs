use std::path::PathBuf;

use hotpush_config::classify;

use crate::fetcher::{ConfigFetcher, RequestHeaders};
use crate::local::LocalConfigProvider;
use crate::observer::{CheckObserver, CheckState, LogObserver};
use crate::report::{CheckFailure, CheckResult, ResultReporter};

/// Inputs of one update-check run.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    pub config_url: String,
    pub host_native_version: u32,
    pub content_root: PathBuf,
    pub headers: RequestHeaders,
}

/// Runs one update check: load the installed config, fetch the remote one,
/// and classify the difference.
///
/// `run` consumes the checker, so each instance yields exactly one result.
pub struct UpdateChecker {
    local: Box<dyn LocalConfigProvider>,
    fetcher: Box<dyn ConfigFetcher>,
    observer: Box<dyn CheckObserver>,
}

struct Run<'a> {
    state: CheckState,
    observer: &'a dyn CheckObserver,
}

impl<'a> Run<'a> {
    fn new(observer: &'a dyn CheckObserver) -> Self {
        Self {
            state: CheckState::Init,
            observer,
        }
    }

    fn advance(&mut self, next: CheckState) {
        debug_assert!(next > self.state, "check state moved from {} to {next}", self.state);
        let previous = std::mem::replace(&mut self.state, next);
        self.observer.on_transition(previous, next);
    }

    fn finish(mut self, result: &CheckResult) {
        self.advance(CheckState::Done);
        self.observer.on_finished(result);
    }
}

impl UpdateChecker {
    pub fn new(
        local: impl LocalConfigProvider + 'static,
        fetcher: impl ConfigFetcher + 'static,
    ) -> Self {
        Self {
            local: Box::new(local),
            fetcher: Box::new(fetcher),
            observer: Box::new(LogObserver),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl CheckObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub async fn run(self, request: &UpdateRequest) -> CheckResult {
        let mut run = Run::new(self.observer.as_ref());
        let result = self.check(&mut run, request).await;
        run.finish(&result);
        result
    }

    /// Run the check and hand its result to `reporter` exactly once.
    pub async fn run_and_report(
        self,
        request: &UpdateRequest,
        reporter: &dyn ResultReporter,
    ) -> CheckResult {
        let result = self.run(request).await;
        reporter.report(&result);
        result
    }

    async fn check(&self, run: &mut Run<'_>, request: &UpdateRequest) -> CheckResult {
        run.advance(CheckState::LoadingLocal);
        let local = match self.local.load_current(&request.content_root).await {
            Ok(config) => config,
            Err(error) => {
                return CheckResult::Failure(CheckFailure::local_config_missing(
                    error.to_string(),
                ));
            }
        };
        if let Err(invalid) = local.validate() {
            return CheckResult::Failure(CheckFailure::local_config_missing(format!(
                "installed {invalid}"
            )));
        }
        self.observer.on_local_loaded(&local);

        run.advance(CheckState::FetchingRemote);
        let remote = match self
            .fetcher
            .fetch(&request.config_url, &request.headers)
            .await
        {
            Ok(config) => config,
            Err(error) => {
                return CheckResult::Failure(CheckFailure::remote_fetch_failed(format!(
                    "{} stage: {error}",
                    error.stage()
                )));
            }
        };
        self.observer.on_remote_fetched(&remote);

        if let Err(invalid) = remote.validate() {
            return CheckResult::Failure(CheckFailure::remote_config_invalid(
                remote,
                invalid.to_string(),
            ));
        }

        run.advance(CheckState::Classifying);
        let outcome = classify(
            local.release_version(),
            remote.release_version(),
            remote.minimum_native_version(),
            request.host_native_version,
        );

        CheckResult::Success {
            remote_config: remote,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use hotpush_config::{CheckOutcome, DocumentError, VersionedConfig};

    use super::*;
    use crate::error::{FetchError, LocalConfigError};
    use crate::report::ErrorKind;

    struct MockLocal {
        installed: Option<VersionedConfig>,
    }

    #[async_trait]
    impl LocalConfigProvider for MockLocal {
        async fn load_current(
            &self,
            content_root: &Path,
        ) -> Result<VersionedConfig, LocalConfigError> {
            self.installed
                .clone()
                .ok_or_else(|| LocalConfigError::Missing {
                    path: content_root.join("chcp.json"),
                })
        }
    }

    struct MockFetcher {
        remote: Option<VersionedConfig>,
        failure: fn() -> FetchError,
        calls: Arc<AtomicUsize>,
        seen_headers: Arc<Mutex<Option<RequestHeaders>>>,
    }

    impl MockFetcher {
        fn new(remote: Option<VersionedConfig>) -> Self {
            Self {
                remote,
                failure: || FetchError::Parse(DocumentError::Empty),
                calls: Arc::new(AtomicUsize::new(0)),
                seen_headers: Arc::new(Mutex::new(None)),
            }
        }

        fn failing_with(failure: fn() -> FetchError) -> Self {
            Self {
                failure,
                ..Self::new(None)
            }
        }
    }

    #[async_trait]
    impl ConfigFetcher for MockFetcher {
        async fn fetch(
            &self,
            _url: &str,
            headers: &RequestHeaders,
        ) -> Result<VersionedConfig, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_headers.lock().expect("headers lock") = Some(headers.clone());
            self.remote.clone().ok_or_else(self.failure)
        }
    }

    #[derive(Clone, Default)]
    struct RecordingObserver {
        transitions: Arc<Mutex<Vec<(CheckState, CheckState)>>>,
        finished: Arc<AtomicUsize>,
    }

    impl CheckObserver for RecordingObserver {
        fn on_transition(&self, from: CheckState, to: CheckState) {
            self.transitions
                .lock()
                .expect("transitions lock")
                .push((from, to));
        }

        fn on_finished(&self, _result: &CheckResult) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn request(host_native_version: u32) -> UpdateRequest {
        UpdateRequest {
            config_url: "https://cdn.example.com/chcp.json".to_string(),
            host_native_version,
            content_root: PathBuf::from("/data/www"),
            headers: RequestHeaders::new(),
        }
    }

    fn installed(release: &str) -> Option<VersionedConfig> {
        Some(VersionedConfig::new(
            release,
            "https://cdn.example.com/www",
            1,
        ))
    }

    fn remote(release: &str, minimum_native: u32) -> Option<VersionedConfig> {
        Some(VersionedConfig::new(
            release,
            "https://cdn.example.com/www",
            minimum_native,
        ))
    }

    async fn run_check(
        local: Option<VersionedConfig>,
        remote: Option<VersionedConfig>,
        host_native_version: u32,
    ) -> CheckResult {
        UpdateChecker::new(MockLocal { installed: local }, MockFetcher::new(remote))
            .run(&request(host_native_version))
            .await
    }

    #[tokio::test]
    async fn same_release_is_no_update_even_when_host_is_too_old() {
        let result = run_check(installed("1.0.0"), remote("1.0.0", 9), 5).await;

        assert_eq!(result.outcome(), Some(CheckOutcome::NoUpdateAvailable));
    }

    #[tokio::test]
    async fn new_release_with_capable_host_is_available() {
        let result = run_check(installed("1.0.0"), remote("1.1.0", 3), 5).await;

        assert_eq!(result.outcome(), Some(CheckOutcome::UpdateAvailable));
        assert_eq!(
            result.remote_config().map(VersionedConfig::release_version),
            Some("1.1.0")
        );
    }

    #[tokio::test]
    async fn new_release_with_old_host_is_incompatible() {
        let result = run_check(installed("1.0.0"), remote("1.1.0", 9), 5).await;

        assert_eq!(
            result.outcome(),
            Some(CheckOutcome::UpdateAvailableButIncompatible)
        );
    }

    #[tokio::test]
    async fn missing_local_config_stops_before_fetching() {
        let fetcher = MockFetcher::new(remote("1.1.0", 0));
        let calls = Arc::clone(&fetcher.calls);

        let result = UpdateChecker::new(MockLocal { installed: None }, fetcher)
            .run(&request(5))
            .await;

        assert_eq!(result.error_kind(), Some(ErrorKind::LocalConfigMissing));
        assert!(result.remote_config().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_local_config_is_treated_as_missing() {
        let fetcher = MockFetcher::new(remote("1.1.0", 0));
        let calls = Arc::clone(&fetcher.calls);
        let local = MockLocal {
            installed: Some(VersionedConfig::new("", "https://cdn.example.com/www", 0)),
        };

        let result = UpdateChecker::new(local, fetcher).run(&request(5)).await;

        assert_eq!(result.error_kind(), Some(ErrorKind::LocalConfigMissing));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_error_carries_no_config() {
        let result = run_check(installed("1.0.0"), None, 5).await;

        let CheckResult::Failure(failure) = result else {
            panic!("expected failure, got {result:?}");
        };
        assert_eq!(failure.kind(), ErrorKind::RemoteFetchFailed);
        assert!(failure.partial_config().is_none());
        assert!(failure.detail().starts_with("response parse stage"));
    }

    #[tokio::test]
    async fn transport_error_is_a_fetch_failure_without_config() {
        let fetcher = MockFetcher::failing_with(|| FetchError::TooLarge { limit: 1024 });
        let calls = Arc::clone(&fetcher.calls);

        let result = UpdateChecker::new(
            MockLocal {
                installed: installed("1.0.0"),
            },
            fetcher,
        )
        .run(&request(5))
        .await;

        let CheckResult::Failure(failure) = result else {
            panic!("expected failure, got {result:?}");
        };
        assert_eq!(failure.kind(), ErrorKind::RemoteFetchFailed);
        assert!(failure.partial_config().is_none());
        assert!(failure.detail().starts_with("request stage"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_remote_config_is_kept_and_never_classified() {
        let observer = RecordingObserver::default();
        let partial = VersionedConfig::new("1.1.0", "", 0);

        let result = UpdateChecker::new(
            MockLocal {
                installed: installed("1.0.0"),
            },
            MockFetcher::new(Some(partial.clone())),
        )
        .with_observer(observer.clone())
        .run(&request(5))
        .await;

        assert_eq!(result.error_kind(), Some(ErrorKind::RemoteConfigInvalid));
        assert_eq!(result.remote_config(), Some(&partial));
        let transitions = observer.transitions.lock().expect("transitions lock");
        assert!(
            transitions
                .iter()
                .all(|(_, to)| *to != CheckState::Classifying)
        );
    }

    #[tokio::test]
    async fn empty_remote_release_is_invalid() {
        let result = run_check(
            installed("1.0.0"),
            Some(VersionedConfig::new("", "https://cdn.example.com/www", 0)),
            5,
        )
        .await;

        assert_eq!(result.error_kind(), Some(ErrorKind::RemoteConfigInvalid));
    }

    #[tokio::test]
    async fn successful_run_visits_every_state_once_in_order() {
        let observer = RecordingObserver::default();

        let _ = UpdateChecker::new(
            MockLocal {
                installed: installed("1.0.0"),
            },
            MockFetcher::new(remote("1.1.0", 3)),
        )
        .with_observer(observer.clone())
        .run(&request(5))
        .await;

        let transitions = observer.transitions.lock().expect("transitions lock");
        assert_eq!(
            *transitions,
            vec![
                (CheckState::Init, CheckState::LoadingLocal),
                (CheckState::LoadingLocal, CheckState::FetchingRemote),
                (CheckState::FetchingRemote, CheckState::Classifying),
                (CheckState::Classifying, CheckState::Done),
            ]
        );
        assert_eq!(observer.finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_run_jumps_straight_to_done() {
        let observer = RecordingObserver::default();

        let _ = UpdateChecker::new(MockLocal { installed: None }, MockFetcher::new(None))
            .with_observer(observer.clone())
            .run(&request(5))
            .await;

        let transitions = observer.transitions.lock().expect("transitions lock");
        assert_eq!(
            *transitions,
            vec![
                (CheckState::Init, CheckState::LoadingLocal),
                (CheckState::LoadingLocal, CheckState::Done),
            ]
        );
    }

    #[tokio::test]
    async fn headers_are_passed_to_fetcher_unchanged() {
        let fetcher = MockFetcher::new(remote("1.1.0", 0));
        let seen = Arc::clone(&fetcher.seen_headers);
        let mut req = request(5);
        req.headers
            .insert("Authorization".to_string(), "Bearer abc".to_string());

        let _ = UpdateChecker::new(
            MockLocal {
                installed: installed("1.0.0"),
            },
            fetcher,
        )
        .run(&req)
        .await;

        let seen = seen.lock().expect("headers lock");
        assert_eq!(seen.as_ref(), Some(&req.headers));
    }

    #[tokio::test]
    async fn reporter_is_called_exactly_once_per_run() {
        let cases = [
            (None, remote("1.1.0", 0)),
            (installed("1.0.0"), None),
            (installed("1.0.0"), Some(VersionedConfig::new("1.1.0", "", 0))),
            (installed("1.0.0"), remote("1.1.0", 0)),
        ];

        for (local, remote) in cases {
            let count = AtomicUsize::new(0);
            let reporter = |_: &CheckResult| {
                count.fetch_add(1, Ordering::SeqCst);
            };

            let _ = UpdateChecker::new(MockLocal { installed: local }, MockFetcher::new(remote))
                .run_and_report(&request(5), &reporter)
                .await;

            assert_eq!(count.load(Ordering::SeqCst), 1);
        }
    }
}
