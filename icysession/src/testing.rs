//! Manual test doubles for the transport and now-playing seams
//!
//! These are hand-written rather than generated: the doubles need shared
//! probes that outlive the boxed trait object handed to the session, and
//! scripted knobs (buffer state, failing opens) that a generated mock
//! would only obscure. Used by this crate's own tests and available to
//! hosts testing their adapters.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::nowplaying::{NowPlayingInfo, NowPlayingSink};
use crate::transport::{Transport, TransportError};

/// One recorded transport call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    Open(String),
    Play,
    Pause,
    Close,
}

/// Transport double that records every call
///
/// Created together with its [`TransportProbe`]; the probe keeps working
/// after the transport itself is boxed and moved into the session.
#[derive(Debug)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<TransportCall>>>,
    open: bool,
    buffer_empty: Arc<AtomicBool>,
    fail_open: Arc<AtomicBool>,
}

/// Shared handle for inspecting and scripting a [`RecordingTransport`]
#[derive(Debug, Clone)]
pub struct TransportProbe {
    calls: Arc<Mutex<Vec<TransportCall>>>,
    buffer_empty: Arc<AtomicBool>,
    fail_open: Arc<AtomicBool>,
}

/// Create a recording transport and its probe
pub fn recording_transport() -> (RecordingTransport, TransportProbe) {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let buffer_empty = Arc::new(AtomicBool::new(false));
    let fail_open = Arc::new(AtomicBool::new(false));

    let transport = RecordingTransport {
        calls: calls.clone(),
        open: false,
        buffer_empty: buffer_empty.clone(),
        fail_open: fail_open.clone(),
    };
    let probe = TransportProbe {
        calls,
        buffer_empty,
        fail_open,
    };
    (transport, probe)
}

impl TransportProbe {
    /// Snapshot of all calls made so far
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls matching `call`
    pub fn count(&self, call: &TransportCall) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    /// Script the transport's reported buffer state
    pub fn set_buffer_empty(&self, empty: bool) {
        self.buffer_empty.store(empty, Ordering::SeqCst);
    }

    /// Make every subsequent `open` fail
    pub fn set_fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn open(&mut self, url: &str) -> Result<(), TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push(TransportCall::Open(url.to_string()));
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(TransportError::Open(format!("scripted failure for {url}")));
        }
        self.open = true;
        self.buffer_empty.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn play(&mut self) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(TransportCall::Play);
        Ok(())
    }

    async fn pause(&mut self) -> Result<(), TransportError> {
        self.calls.lock().unwrap().push(TransportCall::Pause);
        Ok(())
    }

    async fn close(&mut self) {
        self.calls.lock().unwrap().push(TransportCall::Close);
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn buffer_is_empty(&self) -> bool {
        self.buffer_empty.load(Ordering::SeqCst)
    }
}

/// Now-playing sink that captures every update
#[derive(Debug, Clone, Default)]
pub struct CapturingSink {
    updates: Arc<Mutex<Vec<NowPlayingInfo>>>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all updates received so far
    pub fn updates(&self) -> Vec<NowPlayingInfo> {
        self.updates.lock().unwrap().clone()
    }

    /// The most recent update, if any
    pub fn last(&self) -> Option<NowPlayingInfo> {
        self.updates.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl NowPlayingSink for CapturingSink {
    async fn update(&self, info: NowPlayingInfo) {
        self.updates.lock().unwrap().push(info);
    }
}
