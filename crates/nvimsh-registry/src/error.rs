//! Error types for the registry crate.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while fetching or decoding the plugin feed.
///
/// Both kinds are local to a single refresh cycle: the caller logs them and
/// keeps serving whatever catalog it already has.
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("Failed to fetch plugin feed: {0}")]
    #[diagnostic(
        code(nvimsh_registry::fetch),
        help("Check your network connection and the feed URL")
    )]
    FetchFailed(String),

    #[error("Failed to read plugin feed body: {0}")]
    #[diagnostic(
        code(nvimsh_registry::body),
        help("The feed may exceed `max_feed_size` or the connection was cut short")
    )]
    Body(String),

    #[error(transparent)]
    #[diagnostic(
        code(nvimsh_registry::json),
        help("The feed document is malformed or its shape has changed")
    )]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    #[diagnostic(
        code(nvimsh_registry::invalid_url),
        help("Ensure the URL is valid and properly formatted")
    )]
    InvalidUrl(String),
}

impl RegistryError {
    /// Whether the failure happened while decoding rather than transferring.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Json(_))
    }
}

/// A specialized Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
