//! `circuit config`: read and edit `config.toml` by dot-path key.

use circuit_core::Config;
use clap::Subcommand;

use crate::context::CliResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dot-path key (e.g. "playback.countdown_from", "catalog.data_dir")
        key: String,
    },
    /// Change one setting
    Set {
        key: String,
        value: String,
    },
    /// Clear an optional setting such as "catalog.data_dir"
    Unset { key: String },
    /// Print every setting, one `key = value` line each
    List {
        /// Print the config as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print where the config file lives
    Path,
    /// Restore the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CliResult {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown config key: {key}"))?;
            // Unset optionals come back as JSON null.
            if value != "null" {
                println!("{value}");
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("{key} = {value}");
        }
        ConfigAction::Unset { key } => {
            let mut config = Config::load()?;
            config.clear(&key)?;
            config.save()?;
            println!("{key} unset");
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            let width = config
                .entries()
                .iter()
                .map(|(key, _)| key.len())
                .max()
                .unwrap_or(0);
            for (key, value) in config.entries() {
                let value = value.unwrap_or_else(|| "(unset)".into());
                println!("{key:<width$} = {value}");
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
