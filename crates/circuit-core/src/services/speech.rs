//! Spoken exercise announcements.

use std::sync::{Mutex, PoisonError};

use crate::error::HardwareError;

pub trait SpeechBackend: Send + Sync {
    /// Whether the host can synthesize speech at all.
    fn detect(&self) -> bool;

    /// Drop anything still queued.
    fn cancel(&self) -> Result<(), HardwareError>;

    fn speak(&self, text: &str) -> Result<(), HardwareError>;
}

#[derive(Debug, Default)]
struct SpeechState {
    initialized: bool,
    supported: bool,
}

pub struct SpeechService {
    backend: Box<dyn SpeechBackend>,
    state: Mutex<SpeechState>,
}

impl SpeechService {
    pub fn new(backend: Box<dyn SpeechBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(SpeechState::default()),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SpeechState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Detect support once. Later calls are no-ops.
    pub fn init(&self) {
        let mut state = self.state();
        if state.initialized {
            return;
        }
        state.initialized = true;
        state.supported = self.backend.detect();
        if !state.supported {
            tracing::warn!("speech synthesis not supported");
        }
    }

    /// `false` until [`init`](Self::init) has run and found a backend.
    pub fn is_supported(&self) -> bool {
        self.state().supported
    }

    /// Speak `text`, interrupting any announcement still playing.
    pub fn speak(&self, text: &str) {
        if !self.is_supported() {
            tracing::debug!("speech not available, skipping announcement");
            return;
        }
        if let Err(e) = self.backend.cancel() {
            tracing::warn!(error = %e, "failed to cancel pending speech");
        }
        if let Err(e) = self.backend.speak(text) {
            tracing::warn!(error = %e, "speech synthesis failed");
        }
    }
}
