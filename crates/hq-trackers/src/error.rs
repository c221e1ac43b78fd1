//! Tracker error types.

use thiserror::Error;

/// Errors that can occur when fetching bugs from a tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The selected provider lacks credentials or required settings.
    #[error("tracker '{provider}' is not configured: {reason}")]
    Unconfigured {
        provider: &'static str,
        reason: String,
    },

    /// HTTP transport error, including client-side timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Tracker API returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the tracker.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a tracker response or fixture file.
    #[error("parse error: {0}")]
    Parse(String),

    /// Fixture file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The tracker returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}

impl TrackerError {
    /// Missing configuration, as opposed to a provider that was reachable
    /// in principle but failed.
    #[must_use]
    pub const fn is_unconfigured(&self) -> bool {
        matches!(self, Self::Unconfigured { .. })
    }
}
