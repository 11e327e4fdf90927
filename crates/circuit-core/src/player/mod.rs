//! Real-time playback of a linearized workout.

mod clock;
mod engine;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{PlaybackEngine, PlaybackOptions, PlayerServices, PlayerState, SessionInfo};
