//! Error types shared across the crate.
//!
//! Fetch failures keep their diagnostic detail in [`FetchError`] so it can be
//! logged, but the dashboard only ever shows the flat messages below.

use thiserror::Error;

/// Message shown when the users request fails for any reason.
pub const USERS_FETCH_FAILED: &str = "Failed to fetch users";
/// Message shown when a posts request fails for any reason.
pub const POSTS_FETCH_FAILED: &str = "Failed to fetch posts";

/// Application-level result used by the event loop and binary glue.
pub type Result<T> = anyhow::Result<T>;

/// Why a request against the directory API failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The configured base URL could not be joined with the endpoint path.
    #[error("invalid endpoint url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, TLS or timeout failure.
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The body was not the expected JSON shape.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Short tag for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl { .. } => "invalid_url",
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Decode(_) => "decode",
        }
    }
}
