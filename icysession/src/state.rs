//! Playback state machine
//!
//! Tracks the opaque player's reported transport state and the
//! stream-open status, and turns `play`/`pause`/`stop` requests into
//! transport calls. State transitions only happen on explicit external
//! signals or explicit API calls, never spontaneously.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::events::{EventBus, RadioEvent};
use crate::transport::{Transport, TransportStatus};

/// Playback condition of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No stream open
    Idle,
    /// Stream opened, playback not yet reported running
    Buffering,
    /// Playing, or about to play once buffered
    Playing,
    /// Paused; connection retained
    Paused,
    /// Transport reported an unrecoverable failure
    Failed,
}

/// Pluggable reaction to a transport failure
///
/// The reconnect-on-failure policy was never specified by the original
/// system; this slot makes that explicit. The default [`NoRetry`] keeps
/// the machine in [`PlaybackState::Failed`] until the host calls `play()`.
pub trait RetryPolicy: Send + Sync {
    /// Decide whether to immediately re-open the stream after the
    /// `consecutive_failures`-th failure in a row
    fn should_reconnect(&mut self, consecutive_failures: u32) -> bool;
}

/// The default policy: never reconnect automatically
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetry;

impl RetryPolicy for NoRetry {
    fn should_reconnect(&mut self, _consecutive_failures: u32) -> bool {
        false
    }
}

/// Owns the opaque transport and the current [`PlaybackState`]
pub struct PlaybackStateMachine {
    transport: Box<dyn Transport>,
    state: PlaybackState,
    bus: EventBus,
    retry: Box<dyn RetryPolicy>,
    consecutive_failures: u32,
    current_url: Option<String>,
}

impl PlaybackStateMachine {
    /// Create a machine around a transport, publishing state events to `bus`
    pub fn new(transport: Box<dyn Transport>, bus: EventBus) -> Self {
        Self {
            transport,
            state: PlaybackState::Idle,
            bus,
            retry: Box::new(NoRetry),
            consecutive_failures: 0,
            current_url: None,
        }
    }

    /// Replace the retry policy slot
    pub fn with_retry_policy(mut self, policy: Box<dyn RetryPolicy>) -> Self {
        self.retry = policy;
        self
    }

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Open `url`, tearing down any stream already open
    ///
    /// Transitions to `Buffering` on success; a failed open leaves the
    /// machine consistently closed in `Idle` and propagates the error.
    pub async fn open_stream(&mut self, url: &str) -> Result<()> {
        if self.transport.is_open() {
            self.transport.close().await;
        }

        match self.transport.open(url).await {
            Ok(()) => {
                self.current_url = Some(url.to_string());
                self.consecutive_failures = 0;
                self.set_state(PlaybackState::Buffering);
                Ok(())
            }
            Err(e) => {
                self.set_state(PlaybackState::Idle);
                Err(e.into())
            }
        }
    }

    /// Request playback
    ///
    /// Re-opens the stream first when none is open, when the playback
    /// buffer ran dry, or after a failure; otherwise resumes the existing
    /// connection. Always ends by requesting playback from the transport.
    pub async fn play(&mut self, url: &str) -> Result<()> {
        let needs_reopen = !self.transport.is_open()
            || self.transport.buffer_is_empty()
            || self.state == PlaybackState::Failed;

        if needs_reopen {
            self.open_stream(url).await?;
        }

        self.transport.play().await?;
        Ok(())
    }

    /// Request pause; the connection is retained
    pub async fn pause(&mut self) -> Result<()> {
        self.transport.pause().await?;
        self.set_state(PlaybackState::Paused);
        Ok(())
    }

    /// Request pause and release the connection
    pub async fn stop(&mut self) -> Result<()> {
        self.transport.pause().await?;
        self.transport.close().await;
        self.set_state(PlaybackState::Idle);
        Ok(())
    }

    /// Apply a transport-status report from the opaque player
    ///
    /// Publishes the binary playing-or-about-to-play signal, once per
    /// reported change.
    pub fn on_transport_status(&mut self, status: TransportStatus) {
        match status {
            TransportStatus::Paused => self.set_state(PlaybackState::Paused),
            TransportStatus::WaitingToPlayAtRate => self.set_state(PlaybackState::Playing),
        }
        self.bus.publish(RadioEvent::State(status.is_playing()));
    }

    /// Apply a failed-to-reach-end-of-stream report
    ///
    /// Surfaces `Failed` to the host, then consults the retry policy.
    pub async fn on_playback_failed(&mut self) {
        self.consecutive_failures += 1;
        self.set_state(PlaybackState::Failed);
        self.bus.publish(RadioEvent::State(false));

        if self.retry.should_reconnect(self.consecutive_failures) {
            let Some(url) = self.current_url.clone() else {
                return;
            };
            tracing::info!("Retry policy requested reconnect to {}", url);
            if let Err(e) = self.play(&url).await {
                tracing::warn!("Reconnect attempt failed: {}", e);
            }
        }
    }

    fn set_state(&mut self, next: PlaybackState) {
        if self.state != next {
            tracing::debug!("Playback state {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{recording_transport, TransportCall};

    const URL: &str = "https://stream.example/radio.mp3";

    fn machine() -> (PlaybackStateMachine, crate::testing::TransportProbe) {
        let (transport, probe) = recording_transport();
        (
            PlaybackStateMachine::new(Box::new(transport), EventBus::default()),
            probe,
        )
    }

    #[tokio::test]
    async fn test_play_without_open_stream_opens_it() {
        let (mut machine, probe) = machine();
        assert_eq!(machine.state(), PlaybackState::Idle);

        machine.play(URL).await.unwrap();

        assert_eq!(
            probe.calls(),
            vec![TransportCall::Open(URL.to_string()), TransportCall::Play]
        );
        // Buffering until the transport reports otherwise
        assert_eq!(machine.state(), PlaybackState::Buffering);
    }

    #[tokio::test]
    async fn test_stop_releases_and_play_reopens() {
        let (mut machine, probe) = machine();
        machine.play(URL).await.unwrap();
        machine.stop().await.unwrap();
        assert_eq!(machine.state(), PlaybackState::Idle);

        machine.play(URL).await.unwrap();

        let opens = probe
            .calls()
            .iter()
            .filter(|c| matches!(c, TransportCall::Open(_)))
            .count();
        assert_eq!(opens, 2);
    }

    #[tokio::test]
    async fn test_pause_retains_connection() {
        let (mut machine, probe) = machine();
        machine.play(URL).await.unwrap();
        machine.pause().await.unwrap();

        assert_eq!(machine.state(), PlaybackState::Paused);
        assert!(!probe.calls().contains(&TransportCall::Close));

        // Resume does not re-open
        machine.play(URL).await.unwrap();
        let opens = probe
            .calls()
            .iter()
            .filter(|c| matches!(c, TransportCall::Open(_)))
            .count();
        assert_eq!(opens, 1);
    }

    #[tokio::test]
    async fn test_empty_buffer_forces_reopen() {
        let (mut machine, probe) = machine();
        machine.play(URL).await.unwrap();

        probe.set_buffer_empty(true);
        machine.play(URL).await.unwrap();

        let opens = probe
            .calls()
            .iter()
            .filter(|c| matches!(c, TransportCall::Open(_)))
            .count();
        assert_eq!(opens, 2);
    }

    #[tokio::test]
    async fn test_failure_surfaces_failed_state_and_event() {
        let (mut machine, _probe) = machine();
        let mut rx = machine.bus.subscribe();
        machine.play(URL).await.unwrap();

        machine.on_playback_failed().await;

        assert_eq!(machine.state(), PlaybackState::Failed);
        assert_eq!(rx.try_recv().unwrap(), RadioEvent::State(false));

        // play() after a failure re-opens
        machine.play(URL).await.unwrap();
        assert_eq!(machine.state(), PlaybackState::Buffering);
    }

    #[tokio::test]
    async fn test_default_policy_does_not_reconnect() {
        let (mut machine, probe) = machine();
        machine.play(URL).await.unwrap();
        let calls_before = probe.calls().len();

        machine.on_playback_failed().await;

        assert_eq!(probe.calls().len(), calls_before);
    }

    #[tokio::test]
    async fn test_reconnecting_policy_reopens_stream() {
        struct AlwaysReconnect;
        impl RetryPolicy for AlwaysReconnect {
            fn should_reconnect(&mut self, _failures: u32) -> bool {
                true
            }
        }

        let (transport, probe) = recording_transport();
        let mut machine = PlaybackStateMachine::new(Box::new(transport), EventBus::default())
            .with_retry_policy(Box::new(AlwaysReconnect));

        machine.play(URL).await.unwrap();
        machine.on_playback_failed().await;

        let opens = probe
            .calls()
            .iter()
            .filter(|c| matches!(c, TransportCall::Open(_)))
            .count();
        assert_eq!(opens, 2);
        assert_eq!(machine.state(), PlaybackState::Buffering);
    }

    #[tokio::test]
    async fn test_transport_status_maps_to_binary_events() {
        let (mut machine, _probe) = machine();
        let mut rx = machine.bus.subscribe();
        machine.play(URL).await.unwrap();

        machine.on_transport_status(TransportStatus::WaitingToPlayAtRate);
        assert_eq!(machine.state(), PlaybackState::Playing);
        assert_eq!(rx.try_recv().unwrap(), RadioEvent::State(true));

        machine.on_transport_status(TransportStatus::Paused);
        assert_eq!(machine.state(), PlaybackState::Paused);
        assert_eq!(rx.try_recv().unwrap(), RadioEvent::State(false));
    }
}
