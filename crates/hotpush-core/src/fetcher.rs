use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use hotpush_config::{VersionedConfig, parse_document};
use log::debug;

use crate::error::FetchError;

/// Header name to value, sent verbatim with the config request.
pub type RequestHeaders = HashMap<String, String>;

/// Largest config document accepted from the server.
pub const MAX_CONFIG_BYTES: usize = 1024 * 1024;

const ERROR_SNIPPET_CHARS: usize = 160;

#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    /// Fetch and parse the remote application config.
    ///
    /// Performs exactly one request; retry policy belongs to the caller.
    async fn fetch(
        &self,
        url: &str,
        headers: &RequestHeaders,
    ) -> Result<VersionedConfig, FetchError>;
}

/// Build the HTTP client shared by config fetches.
///
/// # Errors
/// Returns an error when the TLS backend cannot be initialized.
pub fn build_client(user_agent: &str, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
}

#[derive(Debug, Clone)]
pub struct HttpConfigFetcher {
    client: reqwest::Client,
    body_limit: usize,
}

impl HttpConfigFetcher {
    #[must_use]
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            body_limit: MAX_CONFIG_BYTES,
        }
    }

    #[must_use]
    pub fn with_body_limit(mut self, body_limit: usize) -> Self {
        self.body_limit = body_limit;
        self
    }

    async fn read_body(&self, mut response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let limit = self.body_limit;
        let too_large = || FetchError::TooLarge { limit };

        if response
            .content_length()
            .is_some_and(|length| length > u64::try_from(limit).unwrap_or(u64::MAX))
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(FetchError::Body)? {
            if body.len() + chunk.len() > limit {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait]
impl ConfigFetcher for HttpConfigFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &RequestHeaders,
    ) -> Result<VersionedConfig, FetchError> {
        if url.trim().is_empty() {
            return Err(FetchError::EmptyUrl);
        }

        debug!("Fetching application config from {url}");

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let mut response = request.send().await.map_err(FetchError::Request)?;

        if !response.status().is_success() {
            let status = response.status();
            // First chunk only; the snippet is diagnostic.
            let body_snippet = response
                .chunk()
                .await
                .ok()
                .flatten()
                .map(|chunk| {
                    response_snippet(&String::from_utf8_lossy(&chunk), ERROR_SNIPPET_CHARS)
                })
                .unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status,
                body_snippet,
            });
        }

        let body = self.read_body(response).await?;
        parse_document(&body).map_err(FetchError::Parse)
    }
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.trim().chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}
