use serde::{Deserialize, Serialize};

use crate::config::{UpdatePolicy, VersionedConfig};
use crate::error::DocumentError;

/// File name of the application config, both on the server and inside an
/// installed content root.
pub const CONFIG_FILE_NAME: &str = "chcp.json";

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    release: String,
    #[serde(default)]
    content_url: String,
    #[serde(default)]
    min_native_interface: u32,
    #[serde(default)]
    update: Option<String>,
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    release: &'a str,
    content_url: &'a str,
    min_native_interface: u32,
    update: UpdatePolicy,
}

fn parse_update_policy(value: Option<&str>) -> UpdatePolicy {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("now") => UpdatePolicy::Now,
        Some(v) if v.eq_ignore_ascii_case("start") => UpdatePolicy::Start,
        _ => UpdatePolicy::Resume,
    }
}

/// Parse an application config document into its content section.
///
/// Missing `release` or `content_url` fields parse as empty strings so the
/// caller can still inspect a partial config; use
/// [`VersionedConfig::validate`] before comparing it.
///
/// # Errors
/// Returns an error when the body is blank, is not JSON, or has fields of
/// the wrong type.
pub fn parse_document(bytes: &[u8]) -> Result<VersionedConfig, DocumentError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(DocumentError::Empty);
    }

    let raw: RawDocument = serde_json::from_slice(bytes)?;

    Ok(
        VersionedConfig::new(raw.release, raw.content_url, raw.min_native_interface)
            .with_update_policy(parse_update_policy(raw.update.as_deref())),
    )
}

/// Render a config back into the document layout used on disk and on the
/// wire.
#[must_use]
pub fn to_document_value(config: &VersionedConfig) -> serde_json::Value {
    let document = DocumentRef {
        release: config.release_version(),
        content_url: config.content_url(),
        min_native_interface: config.minimum_native_version(),
        update: config.update_policy(),
    };
    serde_json::to_value(document).unwrap_or(serde_json::Value::Null)
}
