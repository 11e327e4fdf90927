//! Catalog data compiled into the library.

use std::path::Path;

use super::{parse_json, Catalog, Program};
use crate::error::CatalogError;

const EXERCISES: &str = include_str!("../../data/exercises.json");
const WORKOUTS: &str = include_str!("../../data/workouts.json");
const PROGRAM: &str = include_str!("../../data/program.json");

pub(super) fn load() -> Result<Catalog, CatalogError> {
    let exercises = parse_json(EXERCISES, Path::new("<builtin>/exercises.json"))?;
    let workouts = parse_json(WORKOUTS, Path::new("<builtin>/workouts.json"))?;
    let program: Program = parse_json(PROGRAM, Path::new("<builtin>/program.json"))?;
    Ok(Catalog::from_parts(exercises, workouts, vec![program]))
}

#[cfg(test)]
mod tests {
    use crate::catalog::{Catalog, ExerciseLookup};

    #[test]
    fn builtin_catalog_is_consistent() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.programs().len(), 1);

        for program in catalog.programs() {
            for (week, days) in &program.schedule {
                for (day, template_id) in days {
                    let template = catalog
                        .workout_template(&program.id, week, day)
                        .unwrap_or_else(|| panic!("{week}/{day} -> {template_id} missing"));
                    for block in &template.blocks {
                        assert!(block.rounds >= 1);
                        for drill in &block.drills {
                            assert!(catalog.exercise(drill).is_some(), "unknown drill {drill}");
                        }
                    }
                }
            }
        }
    }
}
