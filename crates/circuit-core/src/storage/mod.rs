mod config;
pub mod database;
pub mod history;
pub mod preferences;

pub use config::{CatalogConfig, Config, LoggingConfig, PlaybackConfig, PlayerConfig};
pub use database::{Database, MemoryStore};
pub use history::{CompletedWorkout, HistoryEntry, HistorySink, HistoryStore, HISTORY_KEY};
pub use preferences::Preferences;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StorageError;

/// String key-value persistence used for history and preferences.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Returns the data directory.
///
/// `CIRCUIT_HOME` wins when set. Otherwise `~/.config/circuit`, or
/// `~/.config/circuit-dev` when `CIRCUIT_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("CIRCUIT_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("CIRCUIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("circuit-dev")
            } else {
                base_dir.join("circuit")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
