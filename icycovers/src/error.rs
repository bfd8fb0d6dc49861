//! Error types for the artwork client

/// Result type alias for artwork operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while querying artwork endpoints
///
/// These errors stay internal to the resolution chain: the high-level
/// [`resolve`](crate::ArtworkClient::resolve) and
/// [`fetch_image`](crate::ArtworkClient::fetch_image) entry points absorb
/// them and report "no artwork" instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Endpoint returned an error status
    #[error("API error: {0}")]
    ApiError(String),
}

impl Error {
    /// Create an API error
    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::ApiError(msg.into())
    }
}
