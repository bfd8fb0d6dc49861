//! Error types for the radio session core

use crate::transport::TransportError;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to the host
///
/// Network and parse failures inside the metadata/artwork path never land
/// here: they degrade to "no artwork" or empty fields. Only configuration
/// and transport-level failures are reported.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stream URL is not an absolute http(s) URL
    #[error("Invalid stream URL: {0}")]
    InvalidStreamUrl(String),

    /// Artwork endpoint is present but not a well-formed URL
    #[error("Invalid artwork endpoint: {0}")]
    InvalidArtworkEndpoint(String),

    /// An operation that needs a stream was called before `set_stream`
    #[error("No stream configured")]
    NoStreamConfigured,

    /// The underlying transport player failed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The artwork HTTP client could not be constructed
    #[error("Artwork client initialization failed: {0}")]
    ArtworkClient(#[from] icycovers::Error),
}
