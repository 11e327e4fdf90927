//! Small user preferences kept in the key-value store.

use serde::{Deserialize, Serialize};

use super::KeyValueStore;
use crate::catalog::Catalog;
use crate::error::{CatalogError, CoreError, StorageError};

pub const PREFS_KEY: &str = "circuit.user_prefs";
pub const SELECTED_PROGRAM_KEY: &str = "circuit.selected_program";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPrefs {
    #[serde(default)]
    voice_enabled: Option<bool>,
}

pub struct Preferences<S> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Stored voice flag. Always `false` when speech is unsupported.
    pub fn voice_enabled(&self, speech_supported: bool) -> bool {
        if !speech_supported {
            return false;
        }
        match self.store.get(PREFS_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<UserPrefs>(&raw) {
                Ok(prefs) => prefs.voice_enabled.unwrap_or(false),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to parse user prefs");
                    false
                }
            },
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read user prefs");
                false
            }
        }
    }

    /// Persist the voice flag. Ignored when speech is unsupported; returns
    /// the effective value.
    ///
    /// # Errors
    /// Returns an error if the preference cannot be written.
    pub fn set_voice_enabled(
        &self,
        speech_supported: bool,
        enabled: bool,
    ) -> Result<bool, StorageError> {
        if !speech_supported {
            return Ok(false);
        }
        let prefs = UserPrefs {
            voice_enabled: Some(enabled),
        };
        let json = serde_json::to_string(&prefs).map_err(|e| StorageError::Serialize {
            key: PREFS_KEY.to_string(),
            message: e.to_string(),
        })?;
        self.store.set(PREFS_KEY, &json)?;
        Ok(enabled)
    }

    /// The program to use: the remembered one if it still exists, else
    /// `fallback` if it exists, else the first program in the catalog.
    pub fn selected_program(&self, catalog: &Catalog, fallback: Option<&str>) -> Option<String> {
        let stored = match self.store.get(SELECTED_PROGRAM_KEY) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read selected program");
                None
            }
        };

        stored
            .filter(|id| catalog.program(id).is_some())
            .or_else(|| {
                fallback
                    .filter(|id| catalog.program(id).is_some())
                    .map(str::to_string)
            })
            .or_else(|| catalog.programs().first().map(|p| p.id.clone()))
    }

    /// Remember a program choice.
    ///
    /// # Errors
    /// Returns an error if the program is unknown or cannot be saved.
    pub fn select_program(&self, catalog: &Catalog, program_id: &str) -> Result<(), CoreError> {
        if catalog.program(program_id).is_none() {
            tracing::warn!(program_id, "program not found");
            return Err(CatalogError::UnknownProgram(program_id.to_string()).into());
        }
        self.store.set(SELECTED_PROGRAM_KEY, program_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Program;
    use crate::storage::MemoryStore;
    use indexmap::IndexMap;

    fn catalog() -> Catalog {
        let program = |id: &str| Program {
            id: id.into(),
            name: id.to_uppercase(),
            description: String::new(),
            schedule: IndexMap::new(),
        };
        Catalog::from_parts(
            IndexMap::new(),
            IndexMap::new(),
            vec![program("base"), program("peak")],
        )
    }

    #[test]
    fn voice_defaults_off_and_persists() {
        let prefs = Preferences::new(MemoryStore::new());
        assert!(!prefs.voice_enabled(true));
        assert!(prefs.set_voice_enabled(true, true).unwrap());
        assert!(prefs.voice_enabled(true));
        assert!(!prefs.voice_enabled(false));
    }

    #[test]
    fn voice_cannot_be_enabled_without_support() {
        let prefs = Preferences::new(MemoryStore::new());
        assert!(!prefs.set_voice_enabled(false, true).unwrap());
        assert!(!prefs.voice_enabled(true));
    }

    #[test]
    fn malformed_prefs_read_as_disabled() {
        let store = MemoryStore::new();
        store.set(PREFS_KEY, "[1, 2").unwrap();
        let prefs = Preferences::new(store);
        assert!(!prefs.voice_enabled(true));
    }

    #[test]
    fn program_selection_falls_back() {
        let catalog = catalog();
        let prefs = Preferences::new(MemoryStore::new());
        assert_eq!(prefs.selected_program(&catalog, None).as_deref(), Some("base"));
        assert_eq!(prefs.selected_program(&catalog, Some("peak")).as_deref(), Some("peak"));
        assert_eq!(prefs.selected_program(&catalog, Some("gone")).as_deref(), Some("base"));

        prefs.select_program(&catalog, "peak").unwrap();
        assert_eq!(prefs.selected_program(&catalog, Some("base")).as_deref(), Some("peak"));
    }

    #[test]
    fn unknown_program_is_rejected() {
        let catalog = catalog();
        let prefs = Preferences::new(MemoryStore::new());
        assert!(prefs.select_program(&catalog, "missing").is_err());
        assert_eq!(prefs.selected_program(&catalog, None).as_deref(), Some("base"));
    }
}
