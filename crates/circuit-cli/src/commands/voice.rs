use clap::Subcommand;

use crate::context::{CliResult, Context};
use crate::terminal;

#[derive(Subcommand)]
pub enum VoiceAction {
    /// Announce exercises during playback
    On,
    /// Stop announcing exercises
    Off,
    /// Show the voice setting and speech support
    Status,
}

pub fn run(action: VoiceAction) -> CliResult {
    let ctx = Context::load()?;
    let prefs = ctx.preferences();
    let supported = terminal::speech_supported();

    match action {
        VoiceAction::On | VoiceAction::Off => {
            let wanted = matches!(action, VoiceAction::On);
            let effective = prefs.set_voice_enabled(supported, wanted)?;
            if wanted && !effective {
                println!("speech is not supported on this system; voice stays off");
            } else {
                println!("voice: {}", if effective { "on" } else { "off" });
            }
        }
        VoiceAction::Status => {
            let enabled = prefs.voice_enabled(supported);
            println!("voice: {}", if enabled { "on" } else { "off" });
            println!("speech supported: {}", if supported { "yes" } else { "no" });
        }
    }
    Ok(())
}
