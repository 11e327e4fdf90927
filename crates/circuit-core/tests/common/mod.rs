//! Shared fixtures for circuit-core integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use circuit_core::catalog::Exercise;
use circuit_core::error::HardwareError;
use circuit_core::services::{
    Cue, SpeechBackend, Tone, ToneBackend, WakeLockBackend, WakeLockService,
};
use circuit_core::storage::{HistoryEntry, HistorySink};
use circuit_core::{
    Block, Hardware, ManualClock, PlaybackEngine, PlaybackOptions, PlayerServices, WorkoutTemplate,
};

/// Everything the fake hardware was asked to do, in order.
#[derive(Debug, Default)]
pub struct Recorder {
    pub cues: Mutex<Vec<Cue>>,
    pub spoken: Mutex<Vec<String>>,
    pub lock_requests: Mutex<u32>,
    pub lock_releases: Mutex<u32>,
    pub speech_supported: bool,
}

impl Recorder {
    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }

    pub fn count(&self, cue: Cue) -> usize {
        self.cues().into_iter().filter(|c| *c == cue).count()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn lock_requests(&self) -> u32 {
        *self.lock_requests.lock().unwrap()
    }

    pub fn lock_releases(&self) -> u32 {
        *self.lock_releases.lock().unwrap()
    }
}

/// Backend handle sharing one recorder.
pub struct Probe(pub Arc<Recorder>);

impl ToneBackend for Probe {
    fn init(&self) -> Result<(), HardwareError> {
        Ok(())
    }

    fn play(&self, cue: Cue, _tones: &[Tone]) -> Result<(), HardwareError> {
        self.0.cues.lock().unwrap().push(cue);
        Ok(())
    }
}

impl SpeechBackend for Probe {
    fn detect(&self) -> bool {
        self.0.speech_supported
    }

    fn cancel(&self) -> Result<(), HardwareError> {
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<(), HardwareError> {
        self.0.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

impl WakeLockBackend for Probe {
    fn detect(&self) -> bool {
        true
    }

    fn request(&self) -> Result<(), HardwareError> {
        *self.0.lock_requests.lock().unwrap() += 1;
        Ok(())
    }

    fn release(&self) -> Result<(), HardwareError> {
        *self.0.lock_releases.lock().unwrap() += 1;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct SharedHistory(pub Arc<Mutex<Vec<HistoryEntry>>>);

impl SharedHistory {
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.0.lock().unwrap().clone()
    }
}

impl HistorySink for SharedHistory {
    fn add_entry(&mut self, entry: HistoryEntry) {
        self.0.lock().unwrap().insert(0, entry);
    }
}

pub struct Harness {
    pub engine: PlaybackEngine,
    pub clock: ManualClock,
    pub recorder: Arc<Recorder>,
    pub history: SharedHistory,
    pub wake_lock: Arc<WakeLockService>,
}

impl Harness {
    /// Tick every `frame_ms` until `total_ms` has passed.
    pub fn run(&mut self, total_ms: u64, frame_ms: u64) -> Vec<circuit_core::Event> {
        let mut events = Vec::new();
        let mut spent = 0;
        while spent < total_ms {
            self.clock.advance_ms(frame_ms);
            spent += frame_ms;
            events.extend(self.engine.tick());
        }
        events
    }
}

pub fn exercises() -> HashMap<String, Exercise> {
    let mut map = HashMap::new();
    for (id, name, instruction) in [
        ("squat", "Squat", "Sit back, chest up"),
        ("lunge", "Lunge", "Long stride"),
        ("plank", "Plank", "Brace"),
    ] {
        map.insert(
            id.to_string(),
            Exercise {
                name: name.to_string(),
                instruction: instruction.to_string(),
                visual_ref: None,
            },
        );
    }
    map
}

pub fn block(
    name: &str,
    rounds: u32,
    drills: &[&str],
    work: u32,
    rest: u32,
    block_rest: u32,
) -> Block {
    Block {
        name: name.to_string(),
        rounds,
        drills: drills.iter().map(|d| d.to_string()).collect(),
        work_sec: work,
        rest_sec: rest,
        block_rest,
    }
}

/// Two rounds of squat/lunge, 20s work, 5s rest.
pub fn two_by_two() -> WorkoutTemplate {
    WorkoutTemplate::new(
        "Legs",
        vec![block("Main", 2, &["squat", "lunge"], 20, 5, 0)],
    )
}

pub fn harness(
    template: &WorkoutTemplate,
    options: PlaybackOptions,
    speech_supported: bool,
) -> Harness {
    let recorder = Arc::new(Recorder {
        speech_supported,
        ..Recorder::default()
    });
    let hardware = Hardware::new(
        Box::new(Probe(recorder.clone())),
        Box::new(Probe(recorder.clone())),
        Box::new(Probe(recorder.clone())),
    );
    let wake_lock = hardware.wake_lock.clone();
    let clock = ManualClock::new();
    let history = SharedHistory::default();
    let services = PlayerServices {
        hardware,
        history: Box::new(history.clone()),
        clock: Arc::new(clock.clone()),
    };
    let engine = PlaybackEngine::from_template(template, &exercises(), services, options);
    Harness {
        engine,
        clock,
        recorder,
        history,
        wake_lock,
    }
}
