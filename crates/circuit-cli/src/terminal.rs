//! Hardware backends for a terminal session.
//!
//! - Cues ring the terminal bell on stderr.
//! - Speech shells out to the first speech synthesizer found on `PATH`.
//! - The wake lock holds a `systemd-inhibit` child for as long as it is held.
//!
//! Setting `CIRCUIT_NO_HARDWARE` swaps all three for inert backends.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, PoisonError};

use circuit_core::error::HardwareError;
use circuit_core::services::{Cue, SpeechBackend, Tone, ToneBackend, WakeLockBackend};
use circuit_core::Hardware;

const SPEECH_PROGRAMS: [&str; 4] = ["espeak-ng", "espeak", "say", "spd-say"];
const INHIBIT_PROGRAM: &str = "systemd-inhibit";

pub fn hardware() -> Hardware {
    if std::env::var_os("CIRCUIT_NO_HARDWARE").is_some() {
        return Hardware::unsupported();
    }
    Hardware::new(
        Box::new(BellTones),
        Box::new(CommandSpeech::from_path()),
        Box::new(InhibitLock::from_path()),
    )
}

/// Speech support on this machine, without touching audio or the wake lock.
pub fn speech_supported() -> bool {
    if std::env::var_os("CIRCUIT_NO_HARDWARE").is_some() {
        return false;
    }
    CommandSpeech::from_path().detect()
}

fn find_program(name: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

fn stop_child(slot: &Mutex<Option<Child>>) -> Result<(), HardwareError> {
    let child = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(mut child) = child {
        // Already exited is fine.
        let _ = child.kill();
        child
            .wait()
            .map_err(|e| HardwareError::Backend(e.to_string()))?;
    }
    Ok(())
}

fn spawn_error(e: std::io::Error) -> HardwareError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => HardwareError::Denied(e.to_string()),
        _ => HardwareError::Backend(e.to_string()),
    }
}

/// Terminal bell. Only available when stderr is a terminal.
pub struct BellTones;

impl ToneBackend for BellTones {
    fn init(&self) -> Result<(), HardwareError> {
        if std::io::stderr().is_terminal() {
            Ok(())
        } else {
            Err(HardwareError::Unsupported)
        }
    }

    fn play(&self, cue: Cue, tones: &[Tone]) -> Result<(), HardwareError> {
        tracing::trace!(?cue, tones = tones.len(), "bell");
        let mut stderr = std::io::stderr().lock();
        stderr
            .write_all(b"\x07")
            .and_then(|()| stderr.flush())
            .map_err(|e| HardwareError::Backend(e.to_string()))
    }
}

/// Speaks through an external synthesizer process, one utterance at a time.
pub struct CommandSpeech {
    program: Option<PathBuf>,
    child: Mutex<Option<Child>>,
}

impl CommandSpeech {
    pub fn from_path() -> Self {
        Self {
            program: SPEECH_PROGRAMS.iter().find_map(|name| find_program(name)),
            child: Mutex::new(None),
        }
    }
}

impl SpeechBackend for CommandSpeech {
    fn detect(&self) -> bool {
        self.program.is_some()
    }

    fn cancel(&self) -> Result<(), HardwareError> {
        stop_child(&self.child)
    }

    fn speak(&self, text: &str) -> Result<(), HardwareError> {
        let program = self.program.as_ref().ok_or(HardwareError::Unsupported)?;
        let child = Command::new(program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;
        *self.child.lock().unwrap_or_else(PoisonError::into_inner) = Some(child);
        Ok(())
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        let _ = stop_child(&self.child);
    }
}

/// Blocks idle and sleep via logind while a child inhibitor runs.
pub struct InhibitLock {
    program: Option<PathBuf>,
    child: Mutex<Option<Child>>,
}

impl InhibitLock {
    pub fn from_path() -> Self {
        Self {
            program: find_program(INHIBIT_PROGRAM),
            child: Mutex::new(None),
        }
    }
}

impl WakeLockBackend for InhibitLock {
    fn detect(&self) -> bool {
        self.program.is_some()
    }

    fn request(&self) -> Result<(), HardwareError> {
        let program = self.program.as_ref().ok_or(HardwareError::Unsupported)?;
        // One inhibitor at a time.
        stop_child(&self.child)?;
        let child = Command::new(program)
            .args([
                "--what=idle:sleep",
                "--who=circuit",
                "--why=Workout in progress",
                "--mode=block",
                "sleep",
                "infinity",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(spawn_error)?;
        *self.child.lock().unwrap_or_else(PoisonError::into_inner) = Some(child);
        Ok(())
    }

    fn release(&self) -> Result<(), HardwareError> {
        stop_child(&self.child)
    }
}

impl Drop for InhibitLock {
    fn drop(&mut self) {
        let _ = stop_child(&self.child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_programs_report_unsupported() {
        let speech = CommandSpeech {
            program: None,
            child: Mutex::new(None),
        };
        assert!(!speech.detect());
        assert!(matches!(speech.speak("hi"), Err(HardwareError::Unsupported)));
        assert!(speech.cancel().is_ok());

        let lock = InhibitLock {
            program: None,
            child: Mutex::new(None),
        };
        assert!(!lock.detect());
        assert!(matches!(lock.request(), Err(HardwareError::Unsupported)));
        assert!(lock.release().is_ok());
    }

    #[test]
    fn find_program_misses_nonsense_names() {
        assert!(find_program("circuit-definitely-not-installed").is_none());
    }
}
