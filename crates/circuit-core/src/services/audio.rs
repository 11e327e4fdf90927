//! Transition sounds.
//!
//! Cues are fixed tone sequences handed to a [`ToneBackend`]. The service
//! owns the mute flag; a muted, uninitialized or unsupported service drops
//! cues silently.

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::HardwareError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One beep, scheduled `offset_ms` after the cue starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    pub waveform: Waveform,
    pub offset_ms: u32,
}

const fn tone(frequency_hz: u32, duration_ms: u32, waveform: Waveform, offset_ms: u32) -> Tone {
    Tone {
        frequency_hz,
        duration_ms,
        waveform,
        offset_ms,
    }
}

const WORK_START: [Tone; 2] = [
    tone(880, 200, Waveform::Sine, 0),
    tone(1100, 150, Waveform::Sine, 100),
];
const REST_START: [Tone; 1] = [tone(440, 300, Waveform::Triangle, 0)];
const COUNTDOWN: [Tone; 1] = [tone(600, 100, Waveform::Square, 0)];
// C5 E5 G5 C6
const COMPLETE: [Tone; 4] = [
    tone(523, 150, Waveform::Sine, 0),
    tone(659, 150, Waveform::Sine, 150),
    tone(784, 150, Waveform::Sine, 300),
    tone(1047, 300, Waveform::Sine, 450),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    WorkStart,
    RestStart,
    CountdownBeep,
    Complete,
}

impl Cue {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Cue::WorkStart => &WORK_START,
            Cue::RestStart => &REST_START,
            Cue::CountdownBeep => &COUNTDOWN,
            Cue::Complete => &COMPLETE,
        }
    }
}

/// Output device for cues.
pub trait ToneBackend: Send + Sync {
    /// Open the device. Called once, on the first user gesture.
    fn init(&self) -> Result<(), HardwareError>;

    fn play(&self, cue: Cue, tones: &[Tone]) -> Result<(), HardwareError>;
}

#[derive(Debug)]
struct AudioState {
    initialized: bool,
    supported: bool,
    enabled: bool,
}

pub struct AudioService {
    backend: Box<dyn ToneBackend>,
    state: Mutex<AudioState>,
}

impl AudioService {
    pub fn new(backend: Box<dyn ToneBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(AudioState {
                initialized: false,
                supported: true,
                enabled: true,
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, AudioState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open the backend once. Later calls are no-ops.
    pub fn init(&self) {
        let mut state = self.state();
        if state.initialized {
            return;
        }
        state.initialized = true;
        if let Err(e) = self.backend.init() {
            tracing::warn!(error = %e, "audio not available, continuing without sound");
            state.supported = false;
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state().enabled = enabled;
    }

    /// Flip the mute flag; returns the new enabled state.
    pub fn toggle(&self) -> bool {
        let mut state = self.state();
        state.enabled = !state.enabled;
        state.enabled
    }

    pub fn play_work_start(&self) {
        self.play(Cue::WorkStart);
    }

    pub fn play_rest_start(&self) {
        self.play(Cue::RestStart);
    }

    pub fn play_countdown_beep(&self) {
        self.play(Cue::CountdownBeep);
    }

    pub fn play_complete(&self) {
        self.play(Cue::Complete);
    }

    fn play(&self, cue: Cue) {
        {
            let state = self.state();
            if !state.enabled || !state.initialized || !state.supported {
                return;
            }
        }
        if let Err(e) = self.backend.play(cue, cue.tones()) {
            tracing::warn!(?cue, error = %e, "audio playback failed");
        }
    }
}
