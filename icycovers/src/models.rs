//! Data models for artwork endpoint responses

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Low-resolution dimension token in track-search artwork URLs
pub const LOW_RES_TOKEN: &str = "30x30bb";

/// High-resolution dimension token substituted before fetching
pub const HIGH_RES_TOKEN: &str = "500x500bb";

/// Response from a station-specific artwork endpoint (AzuraCast-style)
///
/// Only `thumbnail_url` is read; everything else the endpoint returns
/// is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StationArtworkResponse {
    /// URL of the current track's cover image
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Response from the public track-search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Number of matching tracks
    #[serde(rename = "resultCount", default)]
    pub result_count: u64,

    /// Matching tracks, best match first
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// A single track-search match
///
/// The search API returns many more fields per track; only the
/// low-resolution artwork URL is relevant here.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    /// 30x30 artwork URL, upgradable via [`hires_artwork_url`]
    #[serde(rename = "artworkUrl30", default)]
    pub artwork_url_30: Option<String>,
}

/// Rewrite a low-resolution artwork URL to its high-resolution variant
///
/// The search endpoint only exposes a 30x30 thumbnail, but the same CDN
/// path serves a 500x500 rendition under a different dimension token.
pub fn hires_artwork_url(low_res: &str) -> String {
    low_res.replace(LOW_RES_TOKEN, HIGH_RES_TOKEN)
}

/// Where a resolved image came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtworkOrigin {
    /// Station-configured default image
    Default,
    /// URL embedded directly in the stream metadata
    EmbeddedUrl,
    /// Station artwork endpoint (AzuraCast-style `thumbnail_url`)
    Azuracast,
    /// Public track-search endpoint
    Itunes,
}

/// A resolved cover image: raw payload plus its origin
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkImage {
    /// Raw image bytes as served by the origin
    pub bytes: Bytes,
    /// Which source produced the image
    pub origin: ArtworkOrigin,
}

impl ArtworkImage {
    /// Create an image from a payload and its origin
    pub fn new(bytes: Bytes, origin: ArtworkOrigin) -> Self {
        Self { bytes, origin }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hires_rewrite() {
        assert_eq!(
            hires_artwork_url("http://x/30x30bb.jpg"),
            "http://x/500x500bb.jpg"
        );
    }

    #[test]
    fn test_hires_rewrite_no_token() {
        // URLs without the token pass through untouched
        assert_eq!(
            hires_artwork_url("http://x/cover.jpg"),
            "http://x/cover.jpg"
        );
    }

    #[test]
    fn test_search_response_defaults() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.result_count, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_station_response_missing_thumbnail() {
        let response: StationArtworkResponse =
            serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert!(response.thumbnail_url.is_none());
    }
}
