//! Read-only workout catalog.
//!
//! A catalog directory holds three folders of JSON files:
//!
//! - `exercises/*.json` - map of exercise id to [`Exercise`]
//! - `workouts/*.json`  - map of template id to [`WorkoutTemplate`]
//! - `programs/*.json`  - one [`Program`] per file
//!
//! Files are read in file-name order. Exercise and workout maps are merged
//! last-one-wins; every overwritten id is logged. Week and day ordering
//! follows the order in the program file.

mod builtin;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::workout::WorkoutTemplate;

/// Display metadata for one exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub instruction: String,
    #[serde(default)]
    pub visual_ref: Option<String>,
}

/// Exercise metadata provider used by the linearizer.
///
/// Lookups never fail; an unknown id is simply `None`.
pub trait ExerciseLookup {
    fn exercise(&self, id: &str) -> Option<&Exercise>;
}

impl ExerciseLookup for HashMap<String, Exercise> {
    fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.get(id)
    }
}

impl ExerciseLookup for IndexMap<String, Exercise> {
    fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.get(id)
    }
}

/// A multi-week training plan: week key -> day -> workout template id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: IndexMap<String, IndexMap<String, String>>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exercises: IndexMap<String, Exercise>,
    workouts: IndexMap<String, WorkoutTemplate>,
    programs: Vec<Program>,
}

impl Catalog {
    pub fn from_parts(
        exercises: IndexMap<String, Exercise>,
        workouts: IndexMap<String, WorkoutTemplate>,
        programs: Vec<Program>,
    ) -> Self {
        Self {
            exercises,
            workouts,
            programs,
        }
    }

    /// The catalog compiled into the library.
    ///
    /// # Errors
    /// Returns an error only if the embedded data is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        builtin::load()
    }

    /// Load a catalog from a directory laid out as described in the module docs.
    ///
    /// Missing sub-folders are treated as empty.
    ///
    /// # Errors
    /// Returns an error if `dir` cannot be read or any file fails to parse.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::ReadFailed {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            });
        }

        let mut catalog = Catalog::default();

        for path in json_files(&dir.join("exercises"))? {
            let data: IndexMap<String, Exercise> = read_json(&path)?;
            merge_last_wins(&mut catalog.exercises, data, &path);
        }
        for path in json_files(&dir.join("workouts"))? {
            let data: IndexMap<String, WorkoutTemplate> = read_json(&path)?;
            merge_last_wins(&mut catalog.workouts, data, &path);
        }
        for path in json_files(&dir.join("programs"))? {
            let program: Program = read_json(&path)?;
            catalog.programs.push(program);
        }

        tracing::debug!(
            exercises = catalog.exercises.len(),
            workouts = catalog.workouts.len(),
            programs = catalog.programs.len(),
            dir = %dir.display(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn exercises(&self) -> &IndexMap<String, Exercise> {
        &self.exercises
    }

    /// Raw template by id, without program context.
    pub fn workout(&self, id: &str) -> Option<&WorkoutTemplate> {
        self.workouts.get(id)
    }

    pub fn workout_ids(&self) -> impl Iterator<Item = &str> {
        self.workouts.keys().map(String::as_str)
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn program(&self, id: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.id == id)
    }

    /// Week keys of a program in schedule order; empty if the program is unknown.
    pub fn week_keys(&self, program_id: &str) -> Vec<String> {
        self.program(program_id)
            .map(|p| p.schedule.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Day keys of one week; empty if the program or week is unknown.
    pub fn days_for_week(&self, program_id: &str, week_key: &str) -> Vec<String> {
        self.program(program_id)
            .and_then(|p| p.schedule.get(week_key))
            .map(|days| days.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Resolve the template scheduled for `week_key`/`day`.
    ///
    /// The returned template carries its id, week and day.
    pub fn workout_template(
        &self,
        program_id: &str,
        week_key: &str,
        day: &str,
    ) -> Option<WorkoutTemplate> {
        let template_id = self
            .program(program_id)?
            .schedule
            .get(week_key)?
            .get(day)?;
        let template = self.workouts.get(template_id)?;
        Some(WorkoutTemplate {
            id: Some(template_id.clone()),
            week_key: Some(week_key.to_string()),
            day: Some(day.to_string()),
            ..template.clone()
        })
    }
}

impl ExerciseLookup for Catalog {
    fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.exercises.get(id)
    }
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|source| CatalogError::ReadFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CatalogError::ReadFailed {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json(&content, path)
}

fn parse_json<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, CatalogError> {
    serde_json::from_str(content).map_err(|e| CatalogError::ParseFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn merge_last_wins<T>(target: &mut IndexMap<String, T>, data: IndexMap<String, T>, source: &Path) {
    for (id, value) in data {
        if target.contains_key(&id) {
            tracing::warn!(%id, file = %source.display(), "duplicate catalog id, using latest definition");
        }
        target.insert(id, value);
    }
}
