//! Audio-session interruption handling
//!
//! A competing audio session (a phone call, another app taking the output)
//! suspends playback at the OS level; the coordinator only decides whether
//! the session should resume once the interruption ends.

/// What the session should do after an interruption ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptionAction {
    /// Request playback again, exactly once
    Resume,
    /// Leave playback suspended
    Ignore,
}

/// Tracks interruption state and decides the resume action
#[derive(Debug, Default)]
pub struct InterruptionCoordinator {
    interrupted: bool,
}

impl InterruptionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// An interruption began; playback suspension is the OS's doing
    pub fn on_began(&mut self) {
        self.interrupted = true;
        tracing::debug!("Audio interruption began");
    }

    /// The interruption ended
    ///
    /// Resumes only when the interruption source says playback should
    /// resume; otherwise the session stays suspended.
    pub fn on_ended(&mut self, should_resume: bool) -> InterruptionAction {
        self.interrupted = false;
        if should_resume {
            tracing::debug!("Audio interruption ended, resuming");
            InterruptionAction::Resume
        } else {
            tracing::debug!("Audio interruption ended without resume");
            InterruptionAction::Ignore
        }
    }

    /// Whether an interruption is currently active
    pub fn is_interrupted(&self) -> bool {
        self.interrupted
    }
}
