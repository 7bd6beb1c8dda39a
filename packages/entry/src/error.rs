//! Error types for entry trees and their hooks.

/// Errors raised while shaping, reading, or enriching entries.
///
/// Structural errors (`InvalidKey`, `MissingKey`, `NotAnEntry`) are local and
/// deterministic. `LookupFailed` and `Transport` come out of on-load hooks and
/// are handed back unchanged to whoever called `get`.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid key: {message}")]
    InvalidKey { message: String },

    #[error("missing key: {key}")]
    MissingKey { key: String },

    #[error("'{key}' is not an entry or a list")]
    NotAnEntry { key: String },

    #[error("asset size not found: {size}")]
    SizeNotFound { size: String },

    #[error("failed to resolve collection://{collection}/{id}: {message}")]
    LookupFailed {
        collection: String,
        id: String,
        message: String,
    },

    #[error("transport error: {message}")]
    Transport { message: String },

    #[error("invalid document: {message}")]
    InvalidDocument { message: String },
}

impl Error {
    pub(crate) fn invalid_key(message: impl Into<String>) -> Self {
        Error::InvalidKey {
            message: message.into(),
        }
    }

    pub(crate) fn missing_key(key: impl std::fmt::Display) -> Self {
        Error::MissingKey {
            key: key.to_string(),
        }
    }
}
