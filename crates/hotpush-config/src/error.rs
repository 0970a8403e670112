use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    #[error("release version")]
    ReleaseVersion,
    #[error("content url")]
    ContentUrl,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("config is missing its {field}")]
pub struct InvalidConfig {
    pub field: ConfigField,
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("config document is empty")]
    Empty,

    #[error("malformed config document: {0}")]
    Malformed(#[from] serde_json::Error),
}
