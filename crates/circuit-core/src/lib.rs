//! # Circuit Core Library
//!
//! Core logic for the Circuit interval-training player. Everything the CLI
//! does goes through this crate, so another front end only has to supply
//! hardware backends and a frame loop.
//!
//! ## Architecture
//!
//! - **Workout**: block-based templates and the linearizer that flattens
//!   them into a step list
//! - **Player**: a wall-clock playback engine that requires the caller to
//!   periodically invoke `tick()`
//! - **Services**: audio cues, speech and wake lock behind backend traits
//! - **Storage**: SQLite key-value persistence for history and preferences,
//!   TOML configuration
//!
//! ## Key Components
//!
//! - [`linearize`]: template to step list
//! - [`PlaybackEngine`]: step state machine
//! - [`Catalog`]: exercises, workouts and programs
//! - [`HistoryStore`]: completed workout log

pub mod catalog;
pub mod error;
pub mod events;
pub mod player;
pub mod services;
pub mod storage;
pub mod workout;

pub use catalog::{Catalog, Exercise, ExerciseLookup, Program};
pub use error::{CatalogError, ConfigError, CoreError, HardwareError, PlaybackError, StorageError};
pub use events::Event;
pub use player::{
    Clock, ManualClock, PlaybackEngine, PlaybackOptions, PlayerServices, PlayerState, SessionInfo,
    SystemClock,
};
pub use services::Hardware;
pub use storage::{Config, Database, HistoryEntry, HistoryStore, Preferences};
pub use workout::{
    calculate_elapsed_time, calculate_total_duration, format_time, linearize, workout_summary,
    Block, Step, StepKind, StepType, WorkoutSummary, WorkoutTemplate,
};
