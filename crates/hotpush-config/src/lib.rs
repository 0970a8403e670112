mod config;
mod document;
mod error;
mod outcome;

pub use config::{UpdatePolicy, VersionedConfig};
pub use document::{CONFIG_FILE_NAME, parse_document, to_document_value};
pub use error::{ConfigField, DocumentError, InvalidConfig};
pub use outcome::{CheckOutcome, classify};
