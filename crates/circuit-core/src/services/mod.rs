//! Hardware-backed capabilities used during playback.
//!
//! Each capability is a single shared service wrapping a backend trait, so a
//! front end plugs in its platform implementation and tests plug in fakes.
//! All services are initialized lazily on the first user gesture and none of
//! them report failures to the caller.

mod audio;
mod speech;
mod wake_lock;

use std::sync::Arc;

pub use audio::{AudioService, Cue, Tone, ToneBackend, Waveform};
pub use speech::{SpeechBackend, SpeechService};
pub use wake_lock::{WakeLockBackend, WakeLockService};

use crate::error::HardwareError;

/// Shared handles to every capability. Cloning shares the same services.
#[derive(Clone)]
pub struct Hardware {
    pub audio: Arc<AudioService>,
    pub speech: Arc<SpeechService>,
    pub wake_lock: Arc<WakeLockService>,
}

impl Hardware {
    pub fn new(
        tones: Box<dyn ToneBackend>,
        voice: Box<dyn SpeechBackend>,
        lock: Box<dyn WakeLockBackend>,
    ) -> Self {
        Self {
            audio: Arc::new(AudioService::new(tones)),
            speech: Arc::new(SpeechService::new(voice)),
            wake_lock: Arc::new(WakeLockService::new(lock)),
        }
    }

    /// Services with no backing device; everything reports unsupported.
    pub fn unsupported() -> Self {
        Self::new(
            Box::new(Unsupported),
            Box::new(Unsupported),
            Box::new(Unsupported),
        )
    }

    /// Initialize every capability. Idempotent.
    pub fn init(&self) {
        self.audio.init();
        self.wake_lock.init();
        self.speech.init();
    }
}

/// Backend for environments without the capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl ToneBackend for Unsupported {
    fn init(&self) -> Result<(), HardwareError> {
        Err(HardwareError::Unsupported)
    }

    fn play(&self, _cue: Cue, _tones: &[Tone]) -> Result<(), HardwareError> {
        Err(HardwareError::Unsupported)
    }
}

impl SpeechBackend for Unsupported {
    fn detect(&self) -> bool {
        false
    }

    fn cancel(&self) -> Result<(), HardwareError> {
        Ok(())
    }

    fn speak(&self, _text: &str) -> Result<(), HardwareError> {
        Err(HardwareError::Unsupported)
    }
}

impl WakeLockBackend for Unsupported {
    fn detect(&self) -> bool {
        false
    }

    fn request(&self) -> Result<(), HardwareError> {
        Err(HardwareError::Unsupported)
    }

    fn release(&self) -> Result<(), HardwareError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_hardware_is_inert() {
        let hw = Hardware::unsupported();
        hw.init();
        hw.init();
        assert!(!hw.speech.is_supported());
        assert!(!hw.wake_lock.is_supported());
        hw.audio.play_work_start();
        hw.speech.speak("nobody hears this");
        hw.wake_lock.acquire();
        hw.wake_lock.release();
        assert!(!hw.wake_lock.is_locked());
    }
}
