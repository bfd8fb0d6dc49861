//! Stream configuration

use bytes::Bytes;
use url::Url;

use crate::error::{Error, Result};

/// Configuration for one radio stream
///
/// Owned exclusively by the session; immutable once installed. Replacing
/// it through `set_stream` reloads the stream.
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    /// Stream URL the transport player opens
    pub url: String,

    /// Station display title, shown on the now-playing surface until the
    /// first track announcement arrives
    pub title: String,

    /// Station-specific artwork endpoint; when set, it takes priority
    /// over the public track search and no fallback past it is attempted
    pub artwork_endpoint: Option<String>,

    /// Ignore in-band ICY announcements entirely
    pub ignore_icy: bool,

    /// Gate for metadata emission and artwork lookups
    pub premium_enabled: bool,

    /// Fallback cover shown when no artwork resolves
    pub default_artwork: Option<Bytes>,
}

impl StreamConfig {
    /// Create a configuration for a stream URL and station title
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the station artwork endpoint
    pub fn artwork_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.artwork_endpoint = Some(endpoint.into());
        self
    }

    /// Ignore in-band ICY metadata
    pub fn ignore_icy(mut self, ignore: bool) -> Self {
        self.ignore_icy = ignore;
        self
    }

    /// Enable metadata emission and artwork resolution
    pub fn premium_enabled(mut self, enabled: bool) -> Self {
        self.premium_enabled = enabled;
        self
    }

    /// Set the fallback cover image
    pub fn default_artwork(mut self, artwork: Bytes) -> Self {
        self.default_artwork = Some(artwork);
        self
    }

    /// Validate the configuration
    ///
    /// Fails fast, before any stream teardown happens: the stream URL
    /// must be an absolute http(s) URL and the artwork endpoint, when
    /// present, must parse as a URL.
    pub fn validate(&self) -> Result<()> {
        let parsed =
            Url::parse(&self.url).map_err(|_| Error::InvalidStreamUrl(self.url.clone()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidStreamUrl(self.url.clone()));
        }

        if let Some(endpoint) = &self.artwork_endpoint {
            Url::parse(endpoint)
                .map_err(|_| Error::InvalidArtworkEndpoint(endpoint.clone()))?;
        }

        Ok(())
    }
}
