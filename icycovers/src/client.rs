//! HTTP client for cover artwork resolution
//!
//! This module provides the client used to resolve cover images for
//! "artist - title" announcements, either through a station-specific
//! artwork endpoint or through the public track-search API.
//!
//! # Example
//!
//! ```no_run
//! use icycovers::ArtworkClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ArtworkClient::new()?;
//!
//!     if let Some(image) = client.resolve("Miles Davis", "So What", None).await {
//!         println!("Resolved {} bytes from {:?}", image.len(), image.origin);
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{
    hires_artwork_url, ArtworkImage, ArtworkOrigin, SearchResponse, StationArtworkResponse,
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Default public track-search base URL
pub const DEFAULT_SEARCH_BASE: &str = "https://itunes.apple.com";

/// Default timeout for artwork HTTP requests
///
/// Artwork lookups sit between a metadata announcement and the
/// now-playing update; a dead art server must not stall that path.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "icyradio/0.1.0 (icycovers)";

/// Artwork resolution HTTP client
///
/// The client tries sources in priority order and reports absence of
/// artwork as `None`, never as an error:
///
/// 1. With a station override endpoint: query it for `thumbnail_url` and
///    fetch that image. No further fallback is attempted in this branch.
/// 2. Without an override: query the public track-search endpoint for the
///    announcement, upgrade the low-resolution artwork URL it returns, and
///    fetch the image.
///
/// The client is stateless and does not cache responses internally.
/// Deduplication of repeated announcements is the caller's concern.
#[derive(Debug, Clone)]
pub struct ArtworkClient {
    pub(crate) client: Client,
    search_base: String,
    timeout: Duration,
}

impl ArtworkClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client with a custom `reqwest::Client`
    ///
    /// Useful for sharing HTTP connection pools or custom proxy settings
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            search_base: DEFAULT_SEARCH_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Get the track-search base URL
    pub fn search_base(&self) -> &str {
        &self.search_base
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    // ========================================================================
    // Resolution chain
    // ========================================================================

    /// Resolve a cover image URL for an announcement
    ///
    /// When `endpoint_override` is present and non-empty, only the station
    /// endpoint is consulted; otherwise the public track-search endpoint is
    /// queried with `"{artist} - {title}"`.
    ///
    /// Absence of artwork is a normal outcome: every failure along the
    /// chain (timeout, non-2xx, malformed JSON, missing fields) resolves
    /// to `None`.
    pub async fn resolve_url(
        &self,
        artist: &str,
        title: &str,
        endpoint_override: Option<&str>,
    ) -> Option<(String, ArtworkOrigin)> {
        if let Some(endpoint) = endpoint_override.filter(|e| !e.is_empty()) {
            return match self.station_artwork(endpoint).await {
                Ok(Some(url)) => Some((url, ArtworkOrigin::Azuracast)),
                Ok(None) => {
                    tracing::debug!("Station endpoint returned no thumbnail_url");
                    None
                }
                Err(e) => {
                    tracing::debug!("Station artwork lookup failed: {}", e);
                    None
                }
            };
        }

        match self.search_artwork_url(artist, title).await {
            Ok(Some(url)) => Some((url, ArtworkOrigin::Itunes)),
            Ok(None) => {
                tracing::debug!("No search result for {} - {}", artist, title);
                None
            }
            Err(e) => {
                tracing::debug!("Track search failed: {}", e);
                None
            }
        }
    }

    /// Resolve and download a cover image in one call
    ///
    /// Convenience wrapper over [`resolve_url`](Self::resolve_url) and
    /// [`fetch_image`](Self::fetch_image).
    pub async fn resolve(
        &self,
        artist: &str,
        title: &str,
        endpoint_override: Option<&str>,
    ) -> Option<ArtworkImage> {
        let (url, origin) = self.resolve_url(artist, title, endpoint_override).await?;
        let bytes = self.fetch_image(&url).await?;
        Some(ArtworkImage::new(bytes, origin))
    }

    /// Download an image, absorbing any failure into `None`
    pub async fn fetch_image(&self, url: &str) -> Option<Bytes> {
        match self.get_image(url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::debug!("Image download failed for {}: {}", url, e);
                None
            }
        }
    }

    // ========================================================================
    // Fallible lower level
    // ========================================================================

    /// Query a station artwork endpoint for the current `thumbnail_url`
    ///
    /// Returns `Ok(None)` when the endpoint answers without a usable
    /// thumbnail (absent or empty field).
    pub async fn station_artwork(&self, endpoint: &str) -> Result<Option<String>> {
        let url = Url::parse(endpoint)?;

        tracing::debug!("Querying station artwork endpoint: {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(Error::api_error(format!(
                "station endpoint returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: StationArtworkResponse = serde_json::from_str(&body)?;

        Ok(parsed.thumbnail_url.filter(|u| !u.is_empty()))
    }

    /// Query the public track-search endpoint for a high-resolution
    /// artwork URL
    ///
    /// The search term is `"{artist} - {title}"`, percent-encoded so only
    /// ASCII alphanumerics pass through. At most one result is requested;
    /// its 30x30 artwork URL is rewritten to the 500x500 variant.
    pub async fn search_artwork_url(&self, artist: &str, title: &str) -> Result<Option<String>> {
        let term = format!("{} - {}", artist, title);
        let term = utf8_percent_encode(&term, NON_ALPHANUMERIC);
        let url = Url::parse(&format!(
            "{}/search?term={}&limit=1",
            self.search_base, term
        ))?;

        tracing::debug!("Searching artwork: {}", url);

        let response = self.client.get(url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(Error::api_error(format!(
                "search endpoint returned status {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        if parsed.result_count == 0 {
            return Ok(None);
        }

        let low_res = parsed
            .results
            .first()
            .and_then(|r| r.artwork_url_30.as_deref());

        Ok(low_res.map(hires_artwork_url))
    }

    async fn get_image(&self, url: &str) -> Result<Bytes> {
        let url = Url::parse(url)?;

        let response = self.client.get(url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(Error::api_error(format!(
                "image fetch returned status {}",
                response.status()
            )));
        }

        Ok(response.bytes().await?)
    }
}

/// Builder for configuring an ArtworkClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    search_base: String,
    timeout: Duration,
    user_agent: String,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            search_base: DEFAULT_SEARCH_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the track-search base URL
    pub fn search_base(mut self, url: impl Into<String>) -> Self {
        self.search_base = url.into();
        self
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ArtworkClient> {
        let client = if let Some(client) = self.client {
            client
        } else {
            Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout)
                .build()?
        };

        Ok(ArtworkClient {
            client,
            search_base: self.search_base,
            timeout: self.timeout,
        })
    }
}
