use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckSettings {
    #[serde(default)]
    pub config_url: Option<String>,

    #[serde(default)]
    pub content_root: Option<PathBuf>,

    #[serde(default)]
    pub native_version: u32,

    #[serde(default)]
    pub request_headers: HashMap<String, String>,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub debug_logging: bool,

    #[serde(default = "default_max_log_size_bytes")]
    pub max_log_size_bytes: u64,
}

fn default_http_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("hotpush/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_log_size_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            config_url: None,
            content_root: None,
            native_version: 0,
            request_headers: HashMap::new(),
            http_timeout_secs: default_http_timeout(),
            user_agent: default_user_agent(),
            debug_logging: false,
            max_log_size_bytes: default_max_log_size_bytes(),
        }
    }
}

impl CheckSettings {
    /// Load settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
