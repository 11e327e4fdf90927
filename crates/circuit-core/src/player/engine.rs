//! Playback engine.
//!
//! Walks a linearized step list in real time. Like the timer it grew out of,
//! the engine owns no thread: the host calls [`PlaybackEngine::tick`] once per
//! frame and forwards user actions. Time is measured from the injected
//! [`Clock`] on every tick, so irregular frame spacing does not skew the
//! countdown.
//!
//! ## Step states
//!
//! ```text
//! BLOCK_START       -- continue -->  next step (acquires the wake lock)
//! WORK/REST/...     -- timeout  -->  next step, full duration credited
//!                   -- skip     -->  next step, time spent credited
//! WORKOUT_COMPLETE  -- finish   -->  exited
//! ```
//!
//! Advances are never performed inside the code that requests them. A
//! request is queued with the generation of the step that issued it and
//! drained once the current action has finished; a request from an older
//! generation, or one that arrives while a transition is in flight, is
//! dropped. This keeps every logical transition to exactly one advance.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::clock::Clock;
use crate::catalog::ExerciseLookup;
use crate::error::PlaybackError;
use crate::events::Event;
use crate::services::Hardware;
use crate::storage::{CompletedWorkout, HistoryEntry, HistorySink};
use crate::workout::{calculate_total_duration, linearize, Step, StepKind, StepType, WorkoutTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerState {
    /// Created but not started.
    Idle,
    /// On a block marker, waiting for the user to continue.
    AwaitingContinue,
    Running,
    Paused,
    /// On the final step.
    Completed,
    Exited,
}

/// Workout identity carried into the history entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionInfo {
    pub workout_name: String,
    pub week_key: Option<String>,
    pub day: Option<String>,
}

impl SessionInfo {
    pub fn from_template(template: &WorkoutTemplate) -> Self {
        Self {
            workout_name: template.name.clone(),
            week_key: template.week_key.clone(),
            day: template.day.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// Announce each exercise by voice (still subject to mute and support).
    pub voice_enabled: bool,
    /// Highest remaining second that triggers a countdown beep.
    pub countdown_from: u32,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            voice_enabled: false,
            countdown_from: 3,
        }
    }
}

/// Collaborators handed to the engine.
pub struct PlayerServices {
    pub hardware: Hardware,
    pub history: Box<dyn HistorySink>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Advance { generation: u64 },
}

pub struct PlaybackEngine {
    info: SessionInfo,
    steps: Vec<Step>,
    total_duration: u64,
    hardware: Hardware,
    history: Box<dyn HistorySink>,
    clock: Arc<dyn Clock>,
    voice_enabled: bool,
    countdown_from: u32,

    started: bool,
    exited: bool,
    step_index: usize,
    /// Seconds left on the current countdown.
    time_remaining: f64,
    /// Planned length of the current step; zero for marker steps.
    step_duration: f64,
    is_running: bool,
    is_paused: bool,
    /// Seconds worked and rested, excluding pauses.
    elapsed_total: f64,
    last_tick_ms: u64,
    transitioning: bool,
    /// Bumped on every step entry and restart.
    generation: u64,
    history_saved: bool,
    queue: VecDeque<Command>,
}

impl PlaybackEngine {
    pub fn new(
        info: SessionInfo,
        steps: Vec<Step>,
        services: PlayerServices,
        options: PlaybackOptions,
    ) -> Self {
        let total_duration = calculate_total_duration(&steps);
        Self {
            info,
            steps,
            total_duration,
            hardware: services.hardware,
            history: services.history,
            clock: services.clock,
            voice_enabled: options.voice_enabled,
            countdown_from: options.countdown_from,
            started: false,
            exited: false,
            step_index: 0,
            time_remaining: 0.0,
            step_duration: 0.0,
            is_running: false,
            is_paused: false,
            elapsed_total: 0.0,
            last_tick_ms: 0,
            transitioning: false,
            generation: 0,
            history_saved: false,
            queue: VecDeque::new(),
        }
    }

    /// Linearize `template` and build an engine for it.
    pub fn from_template(
        template: &WorkoutTemplate,
        lookup: &dyn ExerciseLookup,
        services: PlayerServices,
        options: PlaybackOptions,
    ) -> Self {
        let steps = linearize(template, lookup);
        Self::new(SessionInfo::from_template(template), steps, services, options)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> PlayerState {
        if self.exited {
            return PlayerState::Exited;
        }
        if !self.started {
            return PlayerState::Idle;
        }
        match self.current_step().map(Step::step_type) {
            Some(StepType::BlockStart) => PlayerState::AwaitingContinue,
            Some(StepType::WorkoutComplete) => PlayerState::Completed,
            Some(_) if self.is_paused => PlayerState::Paused,
            Some(_) => PlayerState::Running,
            None => PlayerState::Idle,
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.step_index)
    }

    pub fn time_remaining(&self) -> f64 {
        self.time_remaining
    }

    pub fn step_duration(&self) -> f64 {
        self.step_duration
    }

    pub fn elapsed_total(&self) -> f64 {
        self.elapsed_total
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.total_duration
    }

    pub fn audio_enabled(&self) -> bool {
        self.hardware.audio.is_enabled()
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    pub fn history_saved(&self) -> bool {
        self.history_saved
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn step_progress(&self) -> f64 {
        if self.step_duration <= 0.0 {
            return 0.0;
        }
        (1.0 - self.time_remaining / self.step_duration).clamp(0.0, 1.0)
    }

    /// 0.0 .. 100.0 position in the step list.
    pub fn progress_pct(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        (self.step_index + 1) as f64 / self.steps.len() as f64 * 100.0
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let step = self.current_step();
        Event::StateSnapshot {
            state: self.state(),
            step_index: self.step_index,
            step_type: step.map(Step::step_type),
            step_label: step.map(Step::label).unwrap_or_default(),
            remaining_secs: self.time_remaining,
            step_duration_secs: self.step_duration,
            elapsed_secs: self.elapsed_total,
            progress_pct: self.progress_pct(),
            total_duration_secs: self.total_duration,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the session on its first step. This is the first user gesture,
    /// so hardware services are initialized here.
    ///
    /// # Errors
    /// Fails if the step list is empty, or the session was already started
    /// or exited.
    pub fn start(&mut self) -> Result<Vec<Event>, PlaybackError> {
        if self.exited {
            return Err(PlaybackError::SessionExited);
        }
        if self.started {
            return Err(PlaybackError::AlreadyStarted);
        }
        if self.steps.is_empty() {
            return Err(PlaybackError::NoWorkoutData);
        }

        self.hardware.init();
        self.started = true;
        tracing::info!(
            workout = %self.info.workout_name,
            steps = self.steps.len(),
            total_secs = self.total_duration,
            "session started"
        );

        let mut events = vec![Event::SessionStarted {
            workout_name: self.info.workout_name.clone(),
            total_steps: self.steps.len(),
            total_duration_secs: self.total_duration,
            at: Utc::now(),
        }];
        self.enter_current_step(&mut events);
        Ok(events)
    }

    /// Leave a block marker and start its first interval.
    pub fn continue_block(&mut self) -> Vec<Event> {
        if !self.is_active() || self.current_type() != Some(StepType::BlockStart) {
            return Vec::new();
        }
        self.hardware.init();
        let mut events = Vec::new();
        self.request_advance();
        self.drain(&mut events);
        events
    }

    /// Advance the countdown by the real time since the previous tick.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.is_active() || !self.is_running || self.is_paused || self.transitioning {
            return events;
        }

        let now = self.clock.now_ms();
        let delta = now.saturating_sub(self.last_tick_ms) as f64 / 1000.0;
        self.last_tick_ms = now;

        let prev = self.time_remaining;
        let next = prev - delta;

        let next_ceil = next.ceil();
        if next_ceil != prev.ceil() && next_ceil > 0.0 && next_ceil <= f64::from(self.countdown_from)
        {
            self.hardware.audio.play_countdown_beep();
            events.push(Event::Countdown {
                step_index: self.step_index,
                seconds_left: next_ceil as u32,
                at: Utc::now(),
            });
        }

        if next <= 0.0 {
            self.elapsed_total += self.step_duration;
            self.time_remaining = 0.0;
            self.is_running = false;
            events.push(Event::StepCompleted {
                step_index: self.step_index,
                step_type: self.current_type().unwrap_or(StepType::Work),
                credited_secs: self.step_duration,
                at: Utc::now(),
            });
            self.request_advance();
        } else {
            self.time_remaining = next;
        }

        self.drain(&mut events);
        events
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_active() || !self.on_timed_step() || !self.is_running || self.is_paused {
            return None;
        }
        self.is_paused = true;
        Some(Event::Paused {
            step_index: self.step_index,
            remaining_secs: self.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if !self.is_active() || !self.is_paused {
            return None;
        }
        // The paused interval must not count against the countdown.
        self.last_tick_ms = self.clock.now_ms();
        self.is_paused = false;
        Some(Event::Resumed {
            step_index: self.step_index,
            remaining_secs: self.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn toggle_pause(&mut self) -> Option<Event> {
        if self.is_paused {
            self.resume()
        } else {
            self.pause()
        }
    }

    /// Leave the current interval early, crediting only the time spent.
    pub fn skip(&mut self) -> Vec<Event> {
        if !self.is_active() || !self.on_timed_step() || self.transitioning {
            return Vec::new();
        }

        let from = self.step_index;
        let spent = (self.step_duration - self.time_remaining).max(0.0);
        self.elapsed_total += spent;
        self.is_running = false;

        let mut events = Vec::new();
        self.request_advance();
        self.drain(&mut events);

        events.insert(
            0,
            Event::StepSkipped {
                from_step: from,
                to_step: self.step_index,
                credited_secs: spent,
                at: Utc::now(),
            },
        );
        events
    }

    /// Throw away all progress and go back to the first step.
    pub fn restart(&mut self) -> Vec<Event> {
        if !self.is_active() {
            return Vec::new();
        }

        self.queue.clear();
        self.generation += 1;
        self.transitioning = false;
        self.history_saved = false;
        self.step_index = 0;
        self.time_remaining = 0.0;
        self.step_duration = 0.0;
        self.is_running = false;
        self.is_paused = false;
        self.elapsed_total = 0.0;
        tracing::info!(workout = %self.info.workout_name, "session restarted");

        let mut events = vec![Event::Restarted { at: Utc::now() }];
        self.enter_current_step(&mut events);
        events
    }

    /// Dismiss the completion screen and end the session.
    pub fn finish(&mut self) -> Option<Event> {
        if self.current_type() != Some(StepType::WorkoutComplete) {
            return None;
        }
        self.exit()
    }

    /// End the session at any point. Stops ticking and releases the wake lock.
    pub fn exit(&mut self) -> Option<Event> {
        if self.exited {
            return None;
        }
        self.exited = true;
        self.is_running = false;
        self.queue.clear();
        self.hardware.wake_lock.release();
        tracing::info!(
            workout = %self.info.workout_name,
            step = self.step_index,
            elapsed_secs = self.elapsed_total,
            "session exited"
        );
        Some(Event::SessionExited {
            step_index: self.step_index,
            elapsed_secs: self.elapsed_total,
            at: Utc::now(),
        })
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.hardware.audio.set_enabled(enabled);
    }

    /// Flip the mute switch; returns whether sound is now on.
    pub fn toggle_audio(&mut self) -> bool {
        self.hardware.audio.toggle()
    }

    pub fn set_voice_enabled(&mut self, enabled: bool) {
        self.voice_enabled = enabled;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn is_active(&self) -> bool {
        self.started && !self.exited
    }

    fn current_type(&self) -> Option<StepType> {
        self.current_step().map(Step::step_type)
    }

    fn on_timed_step(&self) -> bool {
        self.current_type().is_some_and(StepType::is_timed)
    }

    fn request_advance(&mut self) {
        self.queue.push_back(Command::Advance {
            generation: self.generation,
        });
    }

    fn drain(&mut self, events: &mut Vec<Event>) {
        while let Some(command) = self.queue.pop_front() {
            match command {
                Command::Advance { generation } => self.advance(generation, events),
            }
        }
    }

    fn advance(&mut self, generation: u64, events: &mut Vec<Event>) {
        if generation != self.generation || self.transitioning {
            tracing::trace!(generation, current = self.generation, "dropping stale advance");
            return;
        }
        if self.step_index + 1 >= self.steps.len() {
            return;
        }

        self.transitioning = true;
        self.is_running = false;
        let leaving_block_start = self.current_type() == Some(StepType::BlockStart);
        self.step_index += 1;
        if leaving_block_start {
            self.hardware.wake_lock.acquire();
        }
        self.enter_current_step(events);
        self.transitioning = false;
    }

    /// Entry logic of the current step: state reset, then countdown setup,
    /// then notifications.
    fn enter_current_step(&mut self, events: &mut Vec<Event>) {
        let Some(step) = self.steps.get(self.step_index).cloned() else {
            return;
        };
        self.generation += 1;
        self.is_paused = false;

        let now = self.clock.now_ms();
        let duration = f64::from(step.duration_secs());
        self.step_duration = duration;
        self.time_remaining = duration;
        self.is_running = step.is_timed();
        self.last_tick_ms = now;

        tracing::debug!(
            index = self.step_index,
            step_type = ?step.step_type(),
            duration_secs = duration,
            "step entered"
        );
        events.push(Event::StepEntered {
            step_index: self.step_index,
            step_type: step.step_type(),
            duration_secs: step.duration_secs(),
            label: step.label(),
            at: Utc::now(),
        });

        match &step.kind {
            StepKind::Work(work) => {
                self.hardware.audio.play_work_start();
                if self.hardware.audio.is_enabled()
                    && self.voice_enabled
                    && self.hardware.speech.is_supported()
                {
                    let text = format!("{}. {}", work.exercise_name, work.instruction);
                    self.hardware.speech.speak(&text);
                }
            }
            StepKind::Rest(_) | StepKind::BlockRest(_) => {
                self.hardware.audio.play_rest_start();
            }
            StepKind::BlockStart(_) => {}
            StepKind::WorkoutComplete(_) => {
                self.hardware.wake_lock.release();
                self.hardware.audio.play_complete();
                self.record_completion(events);
            }
        }
    }

    fn record_completion(&mut self, events: &mut Vec<Event>) {
        if self.history_saved {
            return;
        }
        self.history_saved = true;

        let entry = HistoryEntry::from_completion(CompletedWorkout {
            workout_name: self.info.workout_name.clone(),
            duration_secs: self.elapsed_total.round() as u64,
            week_key: self.info.week_key.clone(),
            day: self.info.day.clone(),
            date: None,
        });
        let history_id = entry.id.clone();
        self.history.add_entry(entry);

        tracing::info!(
            workout = %self.info.workout_name,
            elapsed_secs = self.elapsed_total,
            "workout complete"
        );
        events.push(Event::WorkoutCompleted {
            workout_name: self.info.workout_name.clone(),
            elapsed_secs: self.elapsed_total,
            history_id: Some(history_id),
            at: Utc::now(),
        });
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        self.hardware.wake_lock.release();
    }
}
