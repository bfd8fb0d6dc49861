//! # icysession - Internet-radio playback core
//!
//! `icysession` manages a continuous audio stream's connection lifecycle,
//! parses embedded ICY-style `"Artist - Title"` announcements, resolves
//! cover artwork through a prioritized source chain (via [`icycovers`]),
//! and publishes the resulting now-playing state to subscribers.
//!
//! The crate does not decode audio or render UI. The host supplies an
//! opaque [`Transport`] player and, optionally, a [`NowPlayingSink`]
//! display surface; the session drives the player and pushes updates out.
//!
//! ## Architecture
//!
//! - [`MetadataPipeline`]: dedups, parses, and enriches raw announcements
//! - [`PlaybackStateMachine`]: transport state tracking and
//!   play/pause/stop/reload, with a pluggable [`RetryPolicy`] slot
//! - [`InterruptionCoordinator`]: resume decisions after audio
//!   interruptions
//! - [`RadioSession`]: the single host-facing orchestrator
//! - [`EventBus`]: typed [`RadioEvent`] broadcast to subscribers
//!
//! ## Quick Start
//!
//! ```no_run
//! use icysession::{RadioEvent, RadioSession, StreamConfig};
//! use icysession::testing::recording_transport;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // A real host passes its audio-engine adapter here
//!     let (transport, _probe) = recording_transport();
//!     let session = RadioSession::new(Box::new(transport))?;
//!     let mut events = session.subscribe();
//!
//!     session
//!         .set_stream(
//!             StreamConfig::new("https://stream.example/radio.mp3", "Example FM")
//!                 .premium_enabled(true),
//!         )
//!         .await?;
//!     session.play().await?;
//!
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             RadioEvent::Metadata(m) => println!("{} - {}", m.artist, m.title),
//!             RadioEvent::State(playing) => println!("playing: {playing}"),
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod interruption;
pub mod nowplaying;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod testing;
pub mod transport;

pub use config::StreamConfig;
pub use error::{Error, Result};
pub use events::{EventBus, RadioEvent, DEFAULT_EVENT_CAPACITY};
pub use interruption::{InterruptionAction, InterruptionCoordinator};
pub use nowplaying::{NowPlayingInfo, NowPlayingSink, NullSink};
pub use pipeline::{Metadata, MetadataPipeline, RawMetadata, TITLE_DELIMITER};
pub use session::{RadioSession, SessionBuilder};
pub use state::{NoRetry, PlaybackState, PlaybackStateMachine, RetryPolicy};
pub use transport::{Transport, TransportError, TransportStatus};

// Re-export the artwork types hosts see in session APIs
pub use icycovers::{ArtworkImage, ArtworkOrigin};
