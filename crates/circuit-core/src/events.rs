use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::player::PlayerState;
use crate::workout::StepType;

/// Every state change in a playback session produces an Event.
/// Front ends render from them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        workout_name: String,
        total_steps: usize,
        total_duration_secs: u64,
        at: DateTime<Utc>,
    },
    StepEntered {
        step_index: usize,
        step_type: StepType,
        duration_secs: u32,
        label: String,
        at: DateTime<Utc>,
    },
    /// Whole-second countdown alert near the end of a timed step.
    Countdown {
        step_index: usize,
        seconds_left: u32,
        at: DateTime<Utc>,
    },
    /// Timed step ran out; the full planned duration was credited.
    StepCompleted {
        step_index: usize,
        step_type: StepType,
        credited_secs: f64,
        at: DateTime<Utc>,
    },
    /// Step left early; only the time actually spent was credited.
    StepSkipped {
        from_step: usize,
        to_step: usize,
        credited_secs: f64,
        at: DateTime<Utc>,
    },
    Paused {
        step_index: usize,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    Resumed {
        step_index: usize,
        remaining_secs: f64,
        at: DateTime<Utc>,
    },
    Restarted {
        at: DateTime<Utc>,
    },
    WorkoutCompleted {
        workout_name: String,
        elapsed_secs: f64,
        history_id: Option<String>,
        at: DateTime<Utc>,
    },
    SessionExited {
        step_index: usize,
        elapsed_secs: f64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: PlayerState,
        step_index: usize,
        step_type: Option<StepType>,
        step_label: String,
        remaining_secs: f64,
        step_duration_secs: f64,
        elapsed_secs: f64,
        progress_pct: f64,
        total_duration_secs: u64,
        at: DateTime<Utc>,
    },
}
