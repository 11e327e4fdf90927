use clap::Subcommand;
use circuit_core::format_time;
use circuit_core::storage::HistoryStore;

use crate::context::{CliResult, Context};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List completed workouts, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one entry
    Delete {
        /// Entry ID
        id: String,
    },
    /// Delete every entry
    Clear,
}

pub fn run(action: HistoryAction) -> CliResult {
    let ctx = Context::load()?;
    let history = HistoryStore::new(ctx.db.clone());

    match action {
        HistoryAction::List { json } => {
            let entries = history.load_all();
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }
            if entries.is_empty() {
                println!("no workouts recorded yet");
                return Ok(());
            }
            for entry in entries {
                let position = match (&entry.week_key, &entry.day) {
                    (Some(week), Some(day)) => format!("{week}/{day}"),
                    _ => "-".to_string(),
                };
                println!(
                    "{}  {:<24} {:>6}  {:<12} {}",
                    entry.date,
                    entry.workout_name,
                    format_time(entry.duration as f64),
                    position,
                    entry.id
                );
            }
        }
        HistoryAction::Delete { id } => {
            if !history.delete_entry(&id) {
                return Err(format!("no history entry with id {id}").into());
            }
            println!("deleted {id}");
        }
        HistoryAction::Clear => {
            history.clear_all();
            println!("history cleared");
        }
    }
    Ok(())
}
