use std::collections::BTreeMap;
use thiserror::Error;

/// Errors surfaced by console operations.
///
/// Every variant resolves to a user-visible message and leaves the client's
/// cached state untouched; nothing here is fatal.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Malformed form input, caught before any request is issued. `field`
    /// names the offending input so the message can be rendered inline.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// A local rule rejected the operation before any request was issued
    /// (last-admin protection, duplicate in-flight mutation).
    #[error("{0}")]
    Invariant(String),

    /// The service rejected the request. The cache was not modified and the
    /// operation is not retried automatically.
    #[error("api error {status} ({code}): {message}")]
    Remote {
        status: u16,
        code: String,
        message: String,
        /// Per-field messages for validation rejections, empty otherwise.
        fields: BTreeMap<String, String>,
    },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ConsoleError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConsoleError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        ConsoleError::Invariant(message.into())
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
