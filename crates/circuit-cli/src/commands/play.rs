//! Real-time workout playback in the terminal.
//!
//! The engine is ticked from a tokio interval while single-key commands are
//! read line by line from stdin.

use std::sync::Arc;
use std::time::Duration;

use circuit_core::storage::{HistoryStore, Preferences};
use circuit_core::{
    format_time, Database, Event, PlaybackEngine, PlaybackOptions, PlayerServices, PlayerState,
    StepType, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::context::{CliResult, Context};
use crate::terminal;

const HELP: &str = "keys: [enter]/c continue  p pause  s skip  r restart  m mute  v voice  q quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Continue,
    Pause,
    Skip,
    Restart,
    Mute,
    Voice,
    Quit,
}

impl Key {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" | "c" => Some(Key::Continue),
            "p" => Some(Key::Pause),
            "s" => Some(Key::Skip),
            "r" => Some(Key::Restart),
            "m" => Some(Key::Mute),
            "v" => Some(Key::Voice),
            "q" => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Prints engine events either as status text or as JSON lines.
struct Renderer {
    json: bool,
}

impl Renderer {
    fn emit(&self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.event(&event);
        }
    }

    fn event(&self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!(error = %e, "failed to encode event"),
            }
            return;
        }

        match event {
            Event::SessionStarted {
                workout_name,
                total_steps,
                total_duration_secs,
                ..
            } => {
                println!(
                    "{workout_name}: {total_steps} steps, {}",
                    format_time(*total_duration_secs as f64)
                );
                println!("{HELP}");
            }
            Event::StepEntered {
                step_type,
                duration_secs,
                label,
                ..
            } => match step_type {
                StepType::BlockStart => println!("\n== {label} == press enter to start"),
                StepType::WorkoutComplete => println!("\n{label}"),
                _ => println!("{label}  {}", format_time(f64::from(*duration_secs))),
            },
            Event::Countdown { seconds_left, .. } => println!("  {seconds_left}"),
            Event::Paused { remaining_secs, .. } => {
                println!("paused ({} left)", format_time(remaining_secs.ceil()));
            }
            Event::Resumed { .. } => println!("resumed"),
            Event::Restarted { .. } => println!("restarting"),
            Event::WorkoutCompleted { elapsed_secs, .. } => {
                println!("time: {}", format_time(elapsed_secs.round()));
            }
            Event::SessionExited { .. } => println!("exited"),
            Event::StepCompleted { .. }
            | Event::StepSkipped { .. }
            | Event::StateSnapshot { .. } => {}
        }
    }

    fn note(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }
}

struct Session {
    engine: PlaybackEngine,
    prefs: Preferences<Arc<Database>>,
    speech_supported: bool,
    renderer: Renderer,
}

impl Session {
    /// Apply one key. Returns `false` once the session should end.
    fn handle(&mut self, key: Key) -> bool {
        match key {
            Key::Continue => {
                let events = self.engine.continue_block();
                self.renderer.emit(events);
            }
            Key::Pause => {
                let event = self.engine.toggle_pause();
                self.renderer.emit(event);
            }
            Key::Skip => {
                let events = self.engine.skip();
                self.renderer.emit(events);
            }
            Key::Restart => {
                let events = self.engine.restart();
                self.renderer.emit(events);
            }
            Key::Mute => {
                let on = self.engine.toggle_audio();
                self.renderer.note(if on { "sound on" } else { "sound off" });
            }
            Key::Voice => self.toggle_voice(),
            Key::Quit => {
                let event = self.engine.exit();
                self.renderer.emit(event);
                return false;
            }
        }
        true
    }

    fn toggle_voice(&mut self) {
        let wanted = !self.engine.voice_enabled();
        match self.prefs.set_voice_enabled(self.speech_supported, wanted) {
            Ok(effective) => {
                self.engine.set_voice_enabled(effective);
                if wanted && !effective {
                    self.renderer.note("speech is not supported on this system");
                } else {
                    self.renderer
                        .note(if effective { "voice on" } else { "voice off" });
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to save voice preference"),
        }
    }

    /// Dismiss the completion screen once it is reached.
    fn finish_if_complete(&mut self) -> bool {
        if self.engine.state() != PlayerState::Completed {
            return true;
        }
        let event = self.engine.finish();
        self.renderer.emit(event);
        false
    }
}

pub fn run(ctx: Context, week: &str, day: &str, json: bool) -> CliResult {
    let program_id = ctx.program_id()?;
    let template = ctx
        .catalog
        .workout_template(&program_id, week, day)
        .ok_or_else(|| format!("no workout scheduled for {week}/{day} in {program_id}"))?;

    let hardware = terminal::hardware();
    hardware.audio.set_enabled(ctx.config.playback.audio_enabled);
    // Running the command is the user gesture that unlocks the hardware.
    hardware.init();

    let prefs = ctx.preferences();
    let speech_supported = hardware.speech.is_supported();
    let options = PlaybackOptions {
        voice_enabled: prefs.voice_enabled(speech_supported),
        countdown_from: ctx.config.playback.countdown_from,
    };
    let services = PlayerServices {
        hardware,
        history: Box::new(HistoryStore::new(ctx.db.clone())),
        clock: Arc::new(SystemClock::new()),
    };
    let mut engine = PlaybackEngine::from_template(&template, &ctx.catalog, services, options);

    let renderer = Renderer { json };
    let started = engine.start()?;
    renderer.emit(started);

    let frame = Duration::from_millis(ctx.config.player.frame_interval_ms.max(1));
    let mut session = Session {
        engine,
        prefs,
        speech_supported,
        renderer,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(play_loop(&mut session, frame));
    // A pending stdin read would otherwise hold up shutdown.
    runtime.shutdown_background();
    result
}

async fn play_loop(session: &mut Session, frame: Duration) -> CliResult {
    let mut ticker = tokio::time::interval(frame);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut listening = true;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let events = session.engine.tick();
                session.renderer.emit(events);
                if !session.finish_if_complete() {
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    let Some(key) = Key::parse(&line) else {
                        session.renderer.note(HELP);
                        continue;
                    };
                    if !session.handle(key) || !session.finish_if_complete() {
                        break;
                    }
                }
                Ok(None) => {
                    tracing::debug!("stdin closed, playing without controls");
                    stdin_open = false;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read stdin");
                    stdin_open = false;
                }
            },
            signal = &mut ctrl_c, if listening => match signal {
                Ok(()) => {
                    let event = session.engine.exit();
                    session.renderer.emit(event);
                    break;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to listen for ctrl-c");
                    listening = false;
                }
            },
        }
    }
    Ok(())
}
