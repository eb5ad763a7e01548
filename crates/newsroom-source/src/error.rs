//! Error types for the source module.

use thiserror::Error;

/// Errors that can occur while polling the upstream feed.
///
/// All of these are recovered locally: the poller logs them and treats the
/// cycle as "no update".
#[derive(Debug, Error)]
pub enum SourceError {
    /// The feed URL could not be parsed.
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),

    /// The HTTP request failed.
    #[error("Feed request failed: {0}")]
    RequestFailed(String),

    /// The server answered with a non-success status.
    #[error("Feed returned HTTP status {0}")]
    BadStatus(u16),

    /// The feed body could not be parsed.
    #[error("Malformed feed body: {0}")]
    MalformedFeed(String),

    /// An item was missing its stable identity.
    #[error("Feed item has no usable identity (no id and no url)")]
    MissingIdentity,
}
