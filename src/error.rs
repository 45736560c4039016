//! Error types for GtR API operations.

use thiserror::Error;

use crate::decoder::ResourceKind;
use crate::format::Serialisation;

/// Errors that can occur during GtR API operations.
#[derive(Debug, Error)]
pub enum GtrError {
    /// Configuration is missing or invalid.
    #[error("GtR configuration error: {0}")]
    Config(String),

    /// The server answered with something other than 200 OK.
    #[error("GtR request to {url} failed with HTTP {status}")]
    FetchFailed { url: String, status: u16 },

    /// No decoder exists for this wire format and resource kind.
    #[error("{kind} is not supported in the {format} serialisation")]
    Unsupported {
        format: Serialisation,
        kind: ResourceKind,
    },

    /// A resource fragment without an id cannot be re-fetched.
    #[error("{kind} has no id to fetch by")]
    MissingId { kind: ResourceKind },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// XML parsing or writing error.
    #[error("Failed to process XML: {0}")]
    XmlError(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Result type alias for GtR operations.
pub type Result<T> = core::result::Result<T, GtrError>;
