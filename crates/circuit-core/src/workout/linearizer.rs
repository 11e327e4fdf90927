//! Workout linearization.
//!
//! Expands the nested block / round / drill structure of a
//! [`WorkoutTemplate`] into a flat, ordered list of [`Step`]s:
//!
//! ```text
//! for block in blocks:
//!     BLOCK_START
//!     for round in 1..=rounds:
//!         for drill in drills:
//!             WORK
//!             REST          (omitted after the last drill of the last round)
//!     BLOCK_REST            (only if block_rest > 0 and not the last block)
//! WORKOUT_COMPLETE
//! ```
//!
//! Output depends only on the template and the exercise lookup, so the same
//! inputs always produce identical sequences.

use serde::{Deserialize, Serialize};

use super::step::{
    BlockRestStep, BlockStartStep, RestStep, Step, StepKind, WorkStep, WorkoutCompleteStep,
};
use super::template::WorkoutTemplate;
use crate::catalog::ExerciseLookup;

/// Display fields resolved for one drill, with fallbacks applied.
struct DrillInfo {
    id: String,
    name: String,
    instruction: String,
    visual_ref: Option<String>,
}

fn resolve(lookup: &dyn ExerciseLookup, id: &str) -> DrillInfo {
    match lookup.exercise(id) {
        Some(exercise) => DrillInfo {
            id: id.to_string(),
            name: exercise.name.clone(),
            instruction: exercise.instruction.clone(),
            visual_ref: exercise.visual_ref.clone(),
        },
        None => DrillInfo {
            id: id.to_string(),
            name: id.to_string(),
            instruction: String::new(),
            visual_ref: None,
        },
    }
}

/// Flatten a workout template into its playback timeline.
///
/// Returns an empty vector when the template has no blocks.
pub fn linearize(template: &WorkoutTemplate, lookup: &dyn ExerciseLookup) -> Vec<Step> {
    if template.blocks.is_empty() {
        return Vec::new();
    }

    let mut steps = Vec::new();
    let mut next_id = 0usize;
    let mut push = |steps: &mut Vec<Step>, kind: StepKind| {
        steps.push(Step { id: next_id, kind });
        next_id += 1;
    };

    let total_blocks = template.blocks.len();

    for (block_index, block) in template.blocks.iter().enumerate() {
        let total_drills = block.drills.len();

        push(
            &mut steps,
            StepKind::BlockStart(BlockStartStep {
                block_name: block.name.clone(),
                block_index,
                total_blocks,
                rounds: block.rounds,
                drill_count: total_drills,
            }),
        );

        let drills: Vec<DrillInfo> = block.drills.iter().map(|id| resolve(lookup, id)).collect();

        for round in 1..=block.rounds {
            let is_last_round = round == block.rounds;

            for (drill_index, drill) in drills.iter().enumerate() {
                let is_last_drill = drill_index + 1 == total_drills;

                push(
                    &mut steps,
                    StepKind::Work(WorkStep {
                        exercise_id: drill.id.clone(),
                        exercise_name: drill.name.clone(),
                        instruction: drill.instruction.clone(),
                        visual_ref: drill.visual_ref.clone(),
                        duration: block.work_sec,
                        block_name: block.name.clone(),
                        block_index,
                        round,
                        total_rounds: block.rounds,
                        drill_index,
                        total_drills,
                    }),
                );

                if is_last_drill && is_last_round {
                    continue;
                }

                let next = &drills[(drill_index + 1) % total_drills];
                push(
                    &mut steps,
                    StepKind::Rest(RestStep {
                        duration: block.rest_sec,
                        block_name: block.name.clone(),
                        block_index,
                        round,
                        total_rounds: block.rounds,
                        next_exercise_id: next.id.clone(),
                        next_exercise: next.name.clone(),
                        next_visual_ref: next.visual_ref.clone(),
                        is_round_transition: is_last_drill,
                    }),
                );
            }
        }

        if block.block_rest > 0 && block_index + 1 < total_blocks {
            let next = template.blocks[block_index + 1]
                .drills
                .first()
                .map(|id| resolve(lookup, id));

            push(
                &mut steps,
                StepKind::BlockRest(BlockRestStep {
                    duration: block.block_rest,
                    block_name: block.name.clone(),
                    block_index,
                    next_exercise_id: next.as_ref().map(|d| d.id.clone()),
                    next_exercise: next.as_ref().map(|d| d.name.clone()),
                    next_visual_ref: next.and_then(|d| d.visual_ref),
                }),
            );
        }
    }

    push(
        &mut steps,
        StepKind::WorkoutComplete(WorkoutCompleteStep {
            workout_name: template.name.clone(),
        }),
    );

    steps
}

/// Sum of all countdown durations in the timeline, in seconds.
pub fn calculate_total_duration(steps: &[Step]) -> u64 {
    steps.iter().map(|s| u64::from(s.duration_secs())).sum()
}

/// Planned seconds of all timed steps strictly before `index`.
pub fn calculate_elapsed_time(steps: &[Step], index: usize) -> u64 {
    debug_assert!(index <= steps.len(), "step index {index} out of range");
    calculate_total_duration(&steps[..index.min(steps.len())])
}

/// Aggregate figures shown before a workout starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Drills summed over blocks, not deduplicated.
    pub exercise_count: usize,
    pub total_rounds: u64,
    /// Seconds, computed from the template without linearizing it.
    pub estimated_duration: u64,
    pub estimated_duration_formatted: String,
}

/// Compute the summary of a template directly from its blocks.
pub fn workout_summary(template: &WorkoutTemplate) -> WorkoutSummary {
    let total_blocks = template.blocks.len();
    let mut exercise_count = 0usize;
    let mut total_rounds = 0u64;
    let mut estimated_duration = 0u64;

    for (index, block) in template.blocks.iter().enumerate() {
        let drills = block.drills.len() as u64;
        let rounds = u64::from(block.rounds);
        let work = u64::from(block.work_sec);
        let rest = u64::from(block.rest_sec);

        exercise_count += block.drills.len();
        total_rounds += rounds;

        let round_time = drills * work + drills.saturating_sub(1) * rest;
        estimated_duration += round_time * rounds + rounds.saturating_sub(1) * rest;

        if block.block_rest > 0 && index + 1 < total_blocks {
            estimated_duration += u64::from(block.block_rest);
        }
    }

    WorkoutSummary {
        exercise_count,
        total_rounds,
        estimated_duration,
        estimated_duration_formatted: format_time(estimated_duration as f64),
    }
}

/// Format seconds as `MM:SS`.
///
/// Fractions are truncated. Negative and non-finite inputs clamp to `00:00`.
/// Minutes are not capped, so long sessions render as e.g. `125:00`.
pub fn format_time(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
