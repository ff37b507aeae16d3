use thiserror::Error;

/// Errors raised by layer edits, document edits, validation and import.
///
/// Every variant is recoverable: the operation that produced it leaves the
/// sequence or document exactly as it was before the call.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A mutation received a value that could not be parsed or is out of range.
    #[error("invalid value {value:?} for `{field}`: {reason}")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    /// The validation gate failed; `field` is the first offending field.
    #[error("invalid configuration: `{field}` {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// An imported document is missing required structure.
    #[error("malformed configuration document: {0}")]
    MalformedDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidFieldValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
