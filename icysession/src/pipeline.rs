//! ICY metadata pipeline
//!
//! Consumes raw track announcements from the stream, deduplicates and
//! parses them, backfills cover artwork through the resolution chain, and
//! publishes the resulting now-playing state.

use std::sync::Arc;

use icycovers::{ArtworkClient, ArtworkImage, ArtworkOrigin};
use serde::{Deserialize, Serialize};

use crate::config::StreamConfig;
use crate::events::{EventBus, RadioEvent};
use crate::nowplaying::{NowPlayingInfo, NowPlayingSink};

/// Delimiter between artist and title in ICY announcements
pub const TITLE_DELIMITER: &str = " - ";

/// Raw metadata fields as delivered by the stream
///
/// Ordered: a title field first, optionally followed by an embedded
/// artwork-URL field. Consumed once by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMetadata {
    title: String,
    artwork_url: Option<String>,
}

impl RawMetadata {
    /// Announcement with a title field only
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artwork_url: None,
        }
    }

    /// Attach an embedded artwork-URL field
    pub fn with_artwork_url(mut self, url: impl Into<String>) -> Self {
        self.artwork_url = Some(url.into());
        self
    }

    /// The raw title field
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The raw embedded artwork-URL field, if delivered
    pub fn artwork_url(&self) -> Option<&str> {
        self.artwork_url.as_deref()
    }
}

/// A parsed, canonical track announcement
///
/// All fields are trimmed of surrounding whitespace. Equality is
/// field-wise; each parse supersedes the previous value, nothing is
/// mutated in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Artist; empty when the announcement had no delimiter
    pub artist: String,
    /// Track title
    pub title: String,
    /// Cover URL: embedded, resolved, or empty
    pub artwork_url: String,
}

impl Metadata {
    /// Parse a raw announcement
    ///
    /// The title field is split on `" - "`: a single segment is a bare
    /// title with an empty artist; with more segments the first is the
    /// artist and the remainder, re-joined, is the title.
    pub fn parse(raw: &RawMetadata) -> Self {
        let field = raw.title().trim();

        let (artist, title) = match field.split_once(TITLE_DELIMITER) {
            None => (String::new(), field.to_string()),
            Some((artist, rest)) => (artist.trim().to_string(), rest.trim().to_string()),
        };

        let artwork_url = raw.artwork_url().unwrap_or_default().trim().to_string();

        Self {
            artist,
            title,
            artwork_url,
        }
    }
}

/// The metadata pipeline: dedup, parse, artwork backfill, publication
///
/// Announcements are processed sequentially; emission order matches
/// arrival order, and a repeated announcement is rejected before any
/// network work starts.
pub struct MetadataPipeline {
    artwork: Arc<ArtworkClient>,
    sink: Arc<dyn NowPlayingSink>,
    bus: EventBus,
    /// Last parsed input, pre-artwork-resolution; dedup key
    last_input: Option<Metadata>,
    /// Most recent artwork, held until the next emission
    current_artwork: Option<ArtworkImage>,
}

impl MetadataPipeline {
    /// Create a pipeline publishing to `bus` and writing to `sink`
    pub fn new(artwork: Arc<ArtworkClient>, sink: Arc<dyn NowPlayingSink>, bus: EventBus) -> Self {
        Self {
            artwork,
            sink,
            bus,
            last_input: None,
            current_artwork: None,
        }
    }

    /// The most recently applied artwork, if any
    pub fn current_artwork(&self) -> Option<&ArtworkImage> {
        self.current_artwork.as_ref()
    }

    /// Process one raw announcement
    ///
    /// Returns the emitted metadata, or `None` when the announcement was
    /// ignored (ICY disabled, duplicate input, or non-premium stream).
    /// Dedup bookkeeping runs even for non-premium streams so a later
    /// premium toggle does not replay a stale announcement.
    pub async fn on_raw_metadata(
        &mut self,
        config: &StreamConfig,
        raw: RawMetadata,
    ) -> Option<Metadata> {
        if config.ignore_icy {
            return None;
        }

        let mut parsed = Metadata::parse(&raw);

        if self.last_input.as_ref() == Some(&parsed) {
            tracing::debug!("Duplicate announcement ignored: {} - {}", parsed.artist, parsed.title);
            return None;
        }
        self.last_input = Some(parsed.clone());

        if !config.premium_enabled {
            tracing::debug!("Metadata suppressed for non-premium stream");
            return None;
        }

        let mut origin = ArtworkOrigin::EmbeddedUrl;
        if parsed.artwork_url.is_empty() {
            if let Some((url, resolved_origin)) = self
                .artwork
                .resolve_url(&parsed.artist, &parsed.title, config.artwork_endpoint.as_deref())
                .await
            {
                parsed.artwork_url = url;
                origin = resolved_origin;
            }
        }

        let image = if parsed.artwork_url.is_empty() {
            None
        } else {
            self.artwork
                .fetch_image(&parsed.artwork_url)
                .await
                .map(|bytes| ArtworkImage::new(bytes, origin))
        };
        let image = image.or_else(|| {
            config
                .default_artwork
                .clone()
                .map(|bytes| ArtworkImage::new(bytes, ArtworkOrigin::Default))
        });

        self.current_artwork = image.clone();
        self.sink
            .update(NowPlayingInfo::track(
                parsed.artist.clone(),
                parsed.title.clone(),
                image,
            ))
            .await;

        tracing::debug!(
            "Metadata emitted: {} - {} (artwork: {})",
            parsed.artist,
            parsed.title,
            if parsed.artwork_url.is_empty() { "none" } else { parsed.artwork_url.as_str() }
        );
        self.bus.publish(RadioEvent::Metadata(parsed.clone()));

        Some(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nowplaying::NullSink;

    fn pipeline() -> MetadataPipeline {
        MetadataPipeline::new(
            Arc::new(ArtworkClient::new().unwrap()),
            Arc::new(NullSink),
            EventBus::default(),
        )
    }

    #[test]
    fn test_parse_artist_and_title() {
        let parsed = Metadata::parse(&RawMetadata::new("Artist - Track"));
        assert_eq!(parsed.artist, "Artist");
        assert_eq!(parsed.title, "Track");
        assert_eq!(parsed.artwork_url, "");
    }

    #[test]
    fn test_parse_bare_title_has_empty_artist() {
        let parsed = Metadata::parse(&RawMetadata::new("JustATitle"));
        assert_eq!(parsed.artist, "");
        assert_eq!(parsed.title, "JustATitle");
    }

    #[test]
    fn test_parse_extra_delimiters_stay_in_title() {
        let parsed = Metadata::parse(&RawMetadata::new("Artist - Track - Live Version"));
        assert_eq!(parsed.artist, "Artist");
        assert_eq!(parsed.title, "Track - Live Version");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let raw = RawMetadata::new("  Artist - Track \n").with_artwork_url(" http://x/a.png ");
        let parsed = Metadata::parse(&raw);
        assert_eq!(parsed.artist, "Artist");
        assert_eq!(parsed.title, "Track");
        assert_eq!(parsed.artwork_url, "http://x/a.png");
    }

    #[tokio::test]
    async fn test_ignore_icy_is_a_noop() {
        let mut pipeline = pipeline();
        let config = StreamConfig::new("https://s.example/r.mp3", "S")
            .ignore_icy(true)
            .premium_enabled(true);

        let result = pipeline
            .on_raw_metadata(&config, RawMetadata::new("Artist - Track"))
            .await;

        assert!(result.is_none());
        assert!(pipeline.last_input.is_none());
    }

    #[tokio::test]
    async fn test_non_premium_keeps_dedup_state_but_emits_nothing() {
        let mut pipeline = pipeline();
        let config = StreamConfig::new("https://s.example/r.mp3", "S");

        let result = pipeline
            .on_raw_metadata(
                &config,
                RawMetadata::new("Artist - Track").with_artwork_url("http://x/a.png"),
            )
            .await;
        assert!(result.is_none());

        // The announcement was still recorded for dedup
        assert_eq!(
            pipeline.last_input.as_ref().map(|m| m.title.as_str()),
            Some("Track")
        );

        // Toggling premium later must not replay the same announcement
        let premium = config.clone().premium_enabled(true);
        let replay = pipeline
            .on_raw_metadata(
                &premium,
                RawMetadata::new("Artist - Track").with_artwork_url("http://x/a.png"),
            )
            .await;
        assert!(replay.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_announcement_is_rejected_before_any_work() {
        let mut pipeline = pipeline();
        // Non-premium so no network is touched in this unit test
        let config = StreamConfig::new("https://s.example/r.mp3", "S");

        let raw = RawMetadata::new("Artist - Track");
        assert!(pipeline.on_raw_metadata(&config, raw.clone()).await.is_none());
        assert!(pipeline.on_raw_metadata(&config, raw).await.is_none());
    }
}
