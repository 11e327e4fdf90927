pub mod config;
pub mod history;
pub mod play;
pub mod program;
pub mod voice;
pub mod workout;
