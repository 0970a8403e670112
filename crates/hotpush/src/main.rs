mod cli;
mod logging;
mod output;
mod settings;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use hotpush_core::{FileConfigProvider, HttpConfigFetcher, UpdateChecker, build_client};
use hotpush_platform::AppPaths;
use log::{error, warn};

use crate::cli::Cli;
use crate::output::JsonLineReporter;
use crate::settings::CheckSettings;

const EXIT_CHECK_FAILED: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let paths = AppPaths::new().ok();

    let settings_path = cli
        .settings
        .clone()
        .or_else(|| paths.as_ref().map(AppPaths::settings_file));
    let (settings, settings_error) = match settings_path.as_deref().map(CheckSettings::load_from) {
        Some(Ok(settings)) => (settings, None),
        Some(Err(error)) => (CheckSettings::default(), Some(error)),
        None => (CheckSettings::default(), None),
    };

    let dirs_error = paths.as_ref().and_then(|paths| paths.ensure_dirs().err());

    let log_path = paths.as_ref().map(AppPaths::log_file);
    logging::init_logging(
        log_path.as_deref(),
        cli.debug || settings.debug_logging,
        settings.max_log_size_bytes,
    );
    if let Some(error) = dirs_error {
        warn!("Failed to create application directories: {error}");
    }
    if let Some(error) = settings_error {
        warn!("Using default settings: {error}");
    }

    let request = match cli.to_request(
        &settings,
        paths.as_ref().map(AppPaths::default_content_root),
    ) {
        Ok(request) => request,
        Err(error) => {
            eprintln!("hotpush-check: {error}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let client = match build_client(
        &settings.user_agent,
        Duration::from_secs(settings.http_timeout_secs),
    ) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to build HTTP client: {err}");
            return ExitCode::from(EXIT_CHECK_FAILED);
        }
    };

    let reporter = JsonLineReporter::new(std::io::stdout(), cli.legacy);
    let result = UpdateChecker::new(FileConfigProvider, HttpConfigFetcher::new(client))
        .run_and_report(&request, &reporter)
        .await;

    if result.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_CHECK_FAILED)
    }
}
