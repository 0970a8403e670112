use std::path::PathBuf;

use clap::Parser;
use hotpush_core::{RequestHeaders, UpdateRequest};
use thiserror::Error;

use crate::settings::CheckSettings;

#[derive(Debug, Parser)]
#[command(name = "hotpush-check")]
#[command(version, about = "Check a content server for a newer hot-push release")]
pub struct Cli {
    /// Settings file (default: platform config directory)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print the result as a legacy bridge event
    #[arg(long)]
    pub legacy: bool,

    /// Extra request header, repeatable
    #[arg(long = "header", value_name = "NAME:VALUE")]
    pub headers: Vec<String>,

    /// URL of the application config on the server
    pub config_url: Option<String>,

    /// Folder holding the installed content and its chcp.json
    pub content_root: Option<PathBuf>,

    /// Native version of the running host
    pub native_version: Option<u32>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvocationError {
    #[error("no config url given and none configured in settings")]
    MissingConfigUrl,
    #[error("no content root given and none could be determined")]
    MissingContentRoot,
    #[error("header '{0}' is not in NAME:VALUE form")]
    MalformedHeader(String),
}

fn parse_header(raw: &str) -> Result<(String, String), InvocationError> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| InvocationError::MalformedHeader(raw.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(InvocationError::MalformedHeader(raw.to_string()));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl Cli {
    /// Merge arguments over settings. Arguments win.
    pub fn to_request(
        &self,
        settings: &CheckSettings,
        default_content_root: Option<PathBuf>,
    ) -> Result<UpdateRequest, InvocationError> {
        let config_url = self
            .config_url
            .clone()
            .or_else(|| settings.config_url.clone())
            .filter(|url| !url.trim().is_empty())
            .ok_or(InvocationError::MissingConfigUrl)?;

        let content_root = self
            .content_root
            .clone()
            .or_else(|| settings.content_root.clone())
            .or(default_content_root)
            .ok_or(InvocationError::MissingContentRoot)?;

        let mut headers: RequestHeaders = settings.request_headers.clone();
        for raw in &self.headers {
            let (name, value) = parse_header(raw)?;
            headers.insert(name, value);
        }

        Ok(UpdateRequest {
            config_url,
            host_native_version: self.native_version.unwrap_or(settings.native_version),
            content_root,
            headers,
        })
    }
}
