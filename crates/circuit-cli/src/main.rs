use clap::{Parser, Subcommand};
use circuit_core::Config;

mod commands;
mod context;
mod terminal;

#[derive(Parser)]
#[command(name = "circuit", version, about = "Circuit interval training player")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Training programs
    Program {
        #[command(subcommand)]
        action: commands::program::ProgramAction,
    },
    /// Browse, preview and play workouts
    Workout {
        #[command(subcommand)]
        action: commands::workout::WorkoutAction,
    },
    /// Completed workout log
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Spoken exercise announcements
    Voice {
        #[command(subcommand)]
        action: commands::voice::VoiceAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr so stdout stays parseable. `RUST_LOG` overrides the
/// configured filter.
fn init_tracing() {
    let configured = Config::load_or_default().logging.filter;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&configured))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Program { action } => commands::program::run(action),
        Commands::Workout { action } => commands::workout::run(action),
        Commands::History { action } => commands::history::run(action),
        Commands::Voice { action } => commands::voice::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
