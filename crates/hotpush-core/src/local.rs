use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hotpush_config::{CONFIG_FILE_NAME, VersionedConfig, parse_document};
use log::debug;

use crate::error::LocalConfigError;

#[async_trait]
pub trait LocalConfigProvider: Send + Sync {
    /// Read the config of the currently installed content.
    async fn load_current(&self, content_root: &Path) -> Result<VersionedConfig, LocalConfigError>;
}

/// Reads `chcp.json` from the root of the installed content folder.
#[derive(Debug, Clone, Default)]
pub struct FileConfigProvider;

impl FileConfigProvider {
    #[must_use]
    pub fn config_path(content_root: &Path) -> PathBuf {
        content_root.join(CONFIG_FILE_NAME)
    }
}

#[async_trait]
impl LocalConfigProvider for FileConfigProvider {
    async fn load_current(&self, content_root: &Path) -> Result<VersionedConfig, LocalConfigError> {
        let path = Self::config_path(content_root);
        debug!("Loading installed config from {}", path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|error| LocalConfigError::from_io(path.clone(), &error))?;

        parse_document(&bytes).map_err(|source| LocalConfigError::Corrupted { path, source })
    }
}
