use serde::Serialize;
use std::fmt;

use crate::error::{ConfigField, InvalidConfig};

/// When the install step should apply a downloaded release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdatePolicy {
    Now,
    Start,
    #[default]
    Resume,
}

/// Snapshot of the content section of an application config.
///
/// Values are fixed at construction. A config with an empty release version
/// or content URL is invalid and must not take part in a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionedConfig {
    release_version: String,
    content_url: String,
    minimum_native_version: u32,
    update_policy: UpdatePolicy,
}

impl VersionedConfig {
    #[must_use]
    pub fn new(
        release_version: impl Into<String>,
        content_url: impl Into<String>,
        minimum_native_version: u32,
    ) -> Self {
        Self {
            release_version: release_version.into(),
            content_url: content_url.into(),
            minimum_native_version,
            update_policy: UpdatePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_update_policy(mut self, update_policy: UpdatePolicy) -> Self {
        self.update_policy = update_policy;
        self
    }

    #[must_use]
    pub fn release_version(&self) -> &str {
        &self.release_version
    }

    #[must_use]
    pub fn content_url(&self) -> &str {
        &self.content_url
    }

    #[must_use]
    pub fn minimum_native_version(&self) -> u32 {
        self.minimum_native_version
    }

    #[must_use]
    pub fn update_policy(&self) -> UpdatePolicy {
        self.update_policy
    }

    /// Check that the release version and content URL are present.
    ///
    /// # Errors
    /// Returns the first empty field, release version first.
    pub fn validate(&self) -> Result<(), InvalidConfig> {
        if self.release_version.is_empty() {
            return Err(InvalidConfig {
                field: ConfigField::ReleaseVersion,
            });
        }
        if self.content_url.is_empty() {
            return Err(InvalidConfig {
                field: ConfigField::ContentUrl,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

impl fmt::Display for VersionedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "release {} (native >= {}) from {}",
            self.release_version, self.minimum_native_version, self.content_url
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_config_is_valid() {
        let config = VersionedConfig::new("1.0.0", "https://cdn.example.com/www", 3);
        assert!(config.is_valid());
        assert_eq!(config.update_policy(), UpdatePolicy::Resume);
    }

    #[test]
    fn empty_release_version_is_reported_first() {
        let config = VersionedConfig::new("", "", 3);
        assert_eq!(
            config.validate(),
            Err(InvalidConfig {
                field: ConfigField::ReleaseVersion
            })
        );
    }

    #[test]
    fn empty_content_url_is_invalid() {
        let config = VersionedConfig::new("1.0.0", "", 3);
        assert_eq!(
            config.validate(),
            Err(InvalidConfig {
                field: ConfigField::ContentUrl
            })
        );
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let config = VersionedConfig::new("1.1.0", "https://cdn.example.com/www", 9)
            .with_update_policy(UpdatePolicy::Now);
        let json = serde_json::to_value(&config).expect("config should serialize");

        assert_eq!(json["releaseVersion"], "1.1.0");
        assert_eq!(json["contentUrl"], "https://cdn.example.com/www");
        assert_eq!(json["minimumNativeVersion"], 9);
        assert_eq!(json["updatePolicy"], "now");
    }
}
