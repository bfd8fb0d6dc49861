//! Now-playing display surface abstraction

use async_trait::async_trait;
use icycovers::ArtworkImage;

/// One now-playing update: what the lock screen / media surface shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NowPlayingInfo {
    /// Track title, or the bare station title before any announcement
    pub title: String,
    /// Track artist; empty when unknown
    pub artist: String,
    /// Cover image, when one resolved (or the configured default)
    pub artwork: Option<ArtworkImage>,
}

impl NowPlayingInfo {
    /// An update carrying only the station title
    pub fn station(title: impl Into<String>, artwork: Option<ArtworkImage>) -> Self {
        Self {
            title: title.into(),
            artist: String::new(),
            artwork,
        }
    }

    /// An update for a parsed track announcement
    pub fn track(
        artist: impl Into<String>,
        title: impl Into<String>,
        artwork: Option<ArtworkImage>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            artwork,
        }
    }
}

/// One-way sink for now-playing updates
///
/// The core only ever writes to the display surface; it never reads it
/// back. Hosts adapt this to their media-session/lock-screen plumbing.
#[async_trait]
pub trait NowPlayingSink: Send + Sync {
    /// Replace the currently displayed now-playing information
    async fn update(&self, info: NowPlayingInfo);
}

/// Sink for hosts without a display surface
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl NowPlayingSink for NullSink {
    async fn update(&self, _info: NowPlayingInfo) {}
}
