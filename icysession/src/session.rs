//! Top-level radio session orchestrator
//!
//! One [`RadioSession`] owns one active stream configuration and wires the
//! playback state machine, the metadata pipeline, and the interruption
//! coordinator together. It is the single point the host calls into and
//! receives events from.
//!
//! # Concurrency
//!
//! State mutation follows a single-writer discipline: the configuration,
//! the state machine, and the pipeline are each behind their own lock,
//! and every mutation goes through the documented operations. The
//! pipeline lock serializes announcement processing, so metadata events
//! are emitted in arrival order and a stale resolution can never overtake
//! a newer one. Artwork fetches are raced against the active stream's
//! cancellation token; `set_stream` cancels the token, so results of a
//! superseded fetch are never applied.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock};

use icycovers::{ArtworkClient, ArtworkImage, ArtworkOrigin};
use tokio::sync::broadcast;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::StreamConfig;
use crate::error::{Error, Result};
use crate::events::{EventBus, RadioEvent, DEFAULT_EVENT_CAPACITY};
use crate::interruption::{InterruptionAction, InterruptionCoordinator};
use crate::nowplaying::{NowPlayingInfo, NowPlayingSink, NullSink};
use crate::pipeline::{Metadata, MetadataPipeline, RawMetadata};
use crate::state::{PlaybackState, PlaybackStateMachine, RetryPolicy};
use crate::transport::{Transport, TransportStatus};

/// The host-facing radio session
///
/// # Example
///
/// ```no_run
/// use icysession::{RadioSession, StreamConfig};
/// use icysession::testing::recording_transport;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (transport, _probe) = recording_transport();
///     let session = RadioSession::new(Box::new(transport))?;
///     let mut events = session.subscribe();
///
///     let config = StreamConfig::new("https://stream.example/radio.mp3", "Example FM")
///         .premium_enabled(true);
///     session.set_stream(config).await?;
///     session.play().await?;
///
///     while let Ok(event) = events.recv().await {
///         println!("{event:?}");
///     }
///     Ok(())
/// }
/// ```
pub struct RadioSession {
    machine: Mutex<PlaybackStateMachine>,
    pipeline: Mutex<MetadataPipeline>,
    interruptions: StdMutex<InterruptionCoordinator>,
    config: RwLock<Option<StreamConfig>>,
    stream_token: StdMutex<CancellationToken>,
    registered_observers: AtomicBool,
    bus: EventBus,
    sink: Arc<dyn NowPlayingSink>,
}

impl RadioSession {
    /// Create a session with default settings around a transport player
    pub fn new(transport: Box<dyn Transport>) -> Result<Self> {
        Self::builder(transport).build()
    }

    /// Create a builder for configuring the session
    pub fn builder(transport: Box<dyn Transport>) -> SessionBuilder {
        SessionBuilder::new(transport)
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<RadioEvent> {
        self.bus.subscribe()
    }

    /// Current playback state
    pub async fn state(&self) -> PlaybackState {
        self.machine.lock().await.state()
    }

    /// The active stream configuration, if one is installed
    pub fn config(&self) -> Option<StreamConfig> {
        self.config.read().unwrap().clone()
    }

    /// The most recently applied cover image, if any
    pub async fn current_artwork(&self) -> Option<ArtworkImage> {
        self.pipeline.lock().await.current_artwork().cloned()
    }

    // ========================================================================
    // Host operations
    // ========================================================================

    /// Install a stream configuration and open it
    ///
    /// Validates first and fails fast without touching existing state.
    /// Any in-flight artwork resolution for the previous stream is
    /// cancelled, the display surface is primed with the bare station
    /// identity, observers are registered (once per session lifetime),
    /// and the transport opens the new URL.
    pub async fn set_stream(&self, config: StreamConfig) -> Result<()> {
        config.validate()?;

        {
            let mut token = self.stream_token.lock().unwrap();
            token.cancel();
            *token = CancellationToken::new();
        }

        self.register_observers_once();

        let artwork = config
            .default_artwork
            .clone()
            .map(|bytes| ArtworkImage::new(bytes, ArtworkOrigin::Default));
        self.sink
            .update(NowPlayingInfo::station(config.title.clone(), artwork))
            .await;

        let url = config.url.clone();
        *self.config.write().unwrap() = Some(config);

        self.machine.lock().await.open_stream(&url).await
    }

    /// Request playback of the configured stream
    pub async fn play(&self) -> Result<()> {
        let url = self.current_url().ok_or(Error::NoStreamConfigured)?;
        self.machine.lock().await.play(&url).await
    }

    /// Request pause; the connection is retained
    pub async fn pause(&self) -> Result<()> {
        if self.current_url().is_none() {
            return Err(Error::NoStreamConfigured);
        }
        self.machine.lock().await.pause().await
    }

    /// Request pause and release the underlying connection
    pub async fn stop(&self) -> Result<()> {
        if self.current_url().is_none() {
            return Err(Error::NoStreamConfigured);
        }
        self.machine.lock().await.stop().await
    }

    // ========================================================================
    // Ingest surface: signals delivered by the transport/OS adapters
    // ========================================================================

    /// Apply a transport-status report
    pub async fn on_transport_status(&self, status: TransportStatus) {
        if !self.observers_registered() {
            tracing::debug!("Transport status before registration, ignored");
            return;
        }
        self.machine.lock().await.on_transport_status(status);
    }

    /// Apply a failed-to-reach-end-of-stream report
    pub async fn on_playback_failed(&self) {
        if !self.observers_registered() {
            tracing::debug!("Failure signal before registration, ignored");
            return;
        }
        self.machine.lock().await.on_playback_failed().await;
    }

    /// Process one raw metadata announcement from the stream
    ///
    /// Returns the emitted metadata, or `None` when the announcement was
    /// ignored or superseded by a stream switch mid-resolution.
    pub async fn on_raw_metadata(&self, raw: RawMetadata) -> Option<Metadata> {
        if !self.observers_registered() {
            tracing::debug!("Raw metadata before registration, ignored");
            return None;
        }
        let config = self.config.read().unwrap().clone()?;
        let token = self.stream_token.lock().unwrap().clone();

        let mut pipeline = self.pipeline.lock().await;
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::debug!("Raw metadata dropped: stream switched mid-resolution");
                None
            }
            result = pipeline.on_raw_metadata(&config, raw) => result,
        }
    }

    /// An audio interruption began
    pub fn on_interruption_began(&self) {
        if !self.observers_registered() {
            return;
        }
        self.interruptions.lock().unwrap().on_began();
    }

    /// An audio interruption ended
    ///
    /// Requests playback exactly once when the interruption source says
    /// playback should resume.
    pub async fn on_interruption_ended(&self, should_resume: bool) -> Result<()> {
        if !self.observers_registered() {
            return Ok(());
        }
        let action = self.interruptions.lock().unwrap().on_ended(should_resume);
        match action {
            InterruptionAction::Resume => self.play().await,
            InterruptionAction::Ignore => Ok(()),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Register interruption/metadata/failure observers, once per session
    ///
    /// Idempotent across repeated `set_stream` calls. Until the first
    /// registration, signals arriving at the ingest surface are dropped.
    fn register_observers_once(&self) {
        if self.registered_observers.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::debug!("Transport and interruption observers registered");
    }

    fn observers_registered(&self) -> bool {
        self.registered_observers.load(Ordering::SeqCst)
    }

    fn current_url(&self) -> Option<String> {
        self.config.read().unwrap().as_ref().map(|c| c.url.clone())
    }
}

/// Builder for configuring a RadioSession
pub struct SessionBuilder {
    transport: Box<dyn Transport>,
    sink: Option<Arc<dyn NowPlayingSink>>,
    artwork: Option<Arc<ArtworkClient>>,
    retry: Option<Box<dyn RetryPolicy>>,
    event_capacity: usize,
}

impl SessionBuilder {
    /// Create a builder around a transport player
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            sink: None,
            artwork: None,
            retry: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Set the now-playing display surface (defaults to [`NullSink`])
    pub fn sink(mut self, sink: Arc<dyn NowPlayingSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set a custom artwork client
    pub fn artwork_client(mut self, artwork: Arc<ArtworkClient>) -> Self {
        self.artwork = Some(artwork);
        self
    }

    /// Set the transport-failure retry policy (defaults to no retry)
    pub fn retry_policy(mut self, policy: Box<dyn RetryPolicy>) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Set the event bus capacity
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build the session
    pub fn build(self) -> Result<RadioSession> {
        let bus = EventBus::new(self.event_capacity);
        let sink: Arc<dyn NowPlayingSink> = self.sink.unwrap_or_else(|| Arc::new(NullSink));
        let artwork = match self.artwork {
            Some(artwork) => artwork,
            None => Arc::new(ArtworkClient::new()?),
        };

        let mut machine = PlaybackStateMachine::new(self.transport, bus.clone());
        if let Some(policy) = self.retry {
            machine = machine.with_retry_policy(policy);
        }
        let pipeline = MetadataPipeline::new(artwork, sink.clone(), bus.clone());

        Ok(RadioSession {
            machine: Mutex::new(machine),
            pipeline: Mutex::new(pipeline),
            interruptions: StdMutex::new(InterruptionCoordinator::new()),
            config: RwLock::new(None),
            stream_token: StdMutex::new(CancellationToken::new()),
            registered_observers: AtomicBool::new(false),
            bus,
            sink,
        })
    }
}
