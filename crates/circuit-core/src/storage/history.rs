//! Completed-workout history.
//!
//! The whole list lives as one JSON array under [`HISTORY_KEY`], newest
//! first. Unreadable stored data is reset to an empty list on load and write
//! failures are logged, so history problems never interrupt a workout.
//! Items that do not decode as a [`HistoryEntry`] are hidden from readers but
//! written back untouched on the next save.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::KeyValueStore;

pub const HISTORY_KEY: &str = "circuit.workout_history";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    /// RFC 3339 timestamp of completion.
    pub date: String,
    pub workout_name: String,
    /// Seconds actually worked and rested.
    #[serde(deserialize_with = "whole_seconds")]
    pub duration: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
}

/// Older records may store fractional seconds.
fn whole_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let secs = f64::deserialize(deserializer)?;
    if !secs.is_finite() {
        return Err(serde::de::Error::custom("duration is not a finite number"));
    }
    Ok(secs.max(0.0).round() as u64)
}

/// What the player knows when a workout finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedWorkout {
    pub workout_name: String,
    pub duration_secs: u64,
    pub week_key: Option<String>,
    pub day: Option<String>,
    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Build an entry with a fresh id.
    pub fn from_completion(workout: CompletedWorkout) -> Self {
        let date = workout.date.unwrap_or_else(Utc::now);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: date.to_rfc3339_opts(SecondsFormat::Millis, true),
            workout_name: workout.workout_name,
            duration: workout.duration_secs,
            week_key: workout.week_key.filter(|w| !w.is_empty()),
            day: workout.day.filter(|d| !d.is_empty()),
        }
    }
}

/// Receiver for completed workouts.
pub trait HistorySink {
    fn add_entry(&mut self, entry: HistoryEntry);
}

pub struct HistoryStore<S> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All entries, newest first. Corrupted data is replaced by an empty list.
    pub fn load_all(&self) -> Vec<HistoryEntry> {
        let items = self.load_items();
        let total = items.len();
        let entries: Vec<HistoryEntry> = items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect();
        if entries.len() != total {
            tracing::warn!(
                skipped = total - entries.len(),
                "skipped unreadable history entries"
            );
        }
        entries
    }

    /// Record a completed workout and return the stored entry.
    pub fn add_workout(&self, workout: CompletedWorkout) -> HistoryEntry {
        let entry = HistoryEntry::from_completion(workout);
        self.prepend(&entry);
        entry
    }

    /// Remove one entry. Returns whether it existed.
    pub fn delete_entry(&self, id: &str) -> bool {
        let mut items = self.load_items();
        let before = items.len();
        items.retain(|item| item.get("id").and_then(Value::as_str) != Some(id));
        let removed = items.len() != before;
        if removed {
            self.persist(&items);
        }
        removed
    }

    pub fn clear_all(&self) {
        self.persist(&[]);
    }

    /// The stored array as raw JSON values.
    fn load_items(&self) -> Vec<Value> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read workout history");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                tracing::warn!("stored workout history is not a list, resetting");
                self.persist(&[]);
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse workout history, resetting");
                self.persist(&[]);
                Vec::new()
            }
        }
    }

    fn prepend(&self, entry: &HistoryEntry) {
        let item = match serde_json::to_value(entry) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode history entry");
                return;
            }
        };
        let mut items = self.load_items();
        items.insert(0, item);
        self.persist(&items);
    }

    fn persist(&self, items: &[Value]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode workout history");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, &json) {
            tracing::warn!(error = %e, "failed to save workout history");
        }
    }
}

impl<S: KeyValueStore> HistorySink for HistoryStore<S> {
    fn add_entry(&mut self, entry: HistoryEntry) {
        self.prepend(&entry);
    }
}
