//! Opaque transport player abstraction
//!
//! The session does not decode audio or manage network buffering itself;
//! it drives an opaque player through [`Transport`] and receives that
//! player's signals back through the session's ingest surface
//! (transport-status changes, raw timed metadata, failure to reach the
//! end of the stream).

use async_trait::async_trait;

/// Transport condition reported by the opaque player
///
/// The player only distinguishes "not playing" from "playing or about to
/// play once buffered"; finer-grained buffering progress is not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportStatus {
    /// Playback is paused
    Paused,
    /// Playback is running, or will start as soon as the buffer allows
    WaitingToPlayAtRate,
}

impl TransportStatus {
    /// The binary playing-or-about-to-play signal published to the host
    pub fn is_playing(self) -> bool {
        matches!(self, TransportStatus::WaitingToPlayAtRate)
    }
}

/// Errors reported by the opaque transport player
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The stream could not be opened
    #[error("failed to open stream: {0}")]
    Open(String),

    /// A playback request failed
    #[error("playback request failed: {0}")]
    Playback(String),
}

/// The opaque audio transport the session drives
///
/// Implementations wrap whatever engine actually moves bytes and decodes
/// audio. The contract deliberately mirrors a media player:
/// `open`/`play`/`pause`/`close` plus two cheap queries the playback
/// state machine needs to decide whether a `play()` must re-open the
/// stream.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the stream at `url`, tearing down any previous one
    async fn open(&mut self, url: &str) -> Result<(), TransportError>;

    /// Request playback of the open stream
    async fn play(&mut self) -> Result<(), TransportError>;

    /// Request pause; the connection is retained
    async fn pause(&mut self) -> Result<(), TransportError>;

    /// Release the stream connection entirely
    async fn close(&mut self);

    /// Whether a stream is currently open
    fn is_open(&self) -> bool;

    /// Whether the open stream's playback buffer has run dry
    fn buffer_is_empty(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_binary_signal() {
        assert!(!TransportStatus::Paused.is_playing());
        assert!(TransportStatus::WaitingToPlayAtRate.is_playing());
    }
}
