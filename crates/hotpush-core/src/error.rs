use std::path::PathBuf;

use hotpush_config::DocumentError;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    #[error("request")]
    Request,
    #[error("response status")]
    Status,
    #[error("response parse")]
    ResponseParse,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("config url is empty")]
    EmptyUrl,
    #[error("failed to request config: {0}")]
    Request(#[source] reqwest::Error),
    #[error("config request failed with HTTP {status}{body_snippet}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body_snippet: String,
    },
    #[error("failed to read config response: {0}")]
    Body(#[source] reqwest::Error),
    #[error("config response exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to parse config response: {0}")]
    Parse(#[source] DocumentError),
}

impl FetchError {
    /// Whether the transport or the document parser produced this error.
    #[must_use]
    pub fn stage(&self) -> FetchStage {
        match self {
            Self::EmptyUrl | Self::Request(_) | Self::Body(_) | Self::TooLarge { .. } => {
                FetchStage::Request
            }
            Self::HttpStatus { .. } => FetchStage::Status,
            Self::Parse(_) => FetchStage::ResponseParse,
        }
    }
}

#[derive(Debug, Error)]
pub enum LocalConfigError {
    #[error("no installed config at {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read installed config at {} ({kind}): {message}", path.display())]
    Unreadable {
        path: PathBuf,
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("installed config at {} is corrupted: {source}", path.display())]
    Corrupted {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

impl LocalConfigError {
    pub(crate) fn from_io(path: PathBuf, error: &std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::Missing { path }
        } else {
            Self::Unreadable {
                path,
                kind: error.kind(),
                message: error.to_string(),
            }
        }
    }
}
