//! Fetch error types.

use std::fmt;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for catalog requests.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Unexpected status code: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The body is not JSON or lacks the `Results` envelope.
    #[error("Invalid response: {0}")]
    Parse(String),

    /// The configured base URL cannot address the catalog endpoints.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Coarse classification of a [`FetchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// Network failure or non-success status.
    Transport,
    /// Malformed payload.
    Parse,
    /// Local misconfiguration; retrying cannot help.
    Config,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::Config => "config",
        };
        f.write_str(name)
    }
}

impl FetchError {
    /// Creates a status error.
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Classifies this error.
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Http(e) if e.is_decode() => FetchErrorKind::Parse,
            Self::Http(_) | Self::Status { .. } => FetchErrorKind::Transport,
            Self::Parse(_) => FetchErrorKind::Parse,
            Self::InvalidUrl(_) => FetchErrorKind::Config,
        }
    }

    /// Returns true if the same request might succeed later.
    ///
    /// Transport and parse failures are always retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind(), FetchErrorKind::Config)
    }
}
