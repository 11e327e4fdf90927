//! Property tests for the workout linearizer.

mod common;

use circuit_core::workout::StepKind;
use circuit_core::{
    calculate_elapsed_time, calculate_total_duration, linearize, workout_summary, Block, StepType,
    WorkoutTemplate,
};
use proptest::prelude::*;

fn arb_block() -> impl Strategy<Value = Block> {
    (
        1u32..4,
        prop::collection::vec(
            prop::sample::select(vec!["squat", "lunge", "plank", "mystery"]),
            1..4,
        ),
        0u32..60,
        0u32..30,
        0u32..90,
    )
        .prop_map(|(rounds, drills, work_sec, rest_sec, block_rest)| Block {
            name: "Block".into(),
            rounds,
            drills: drills.into_iter().map(String::from).collect(),
            work_sec,
            rest_sec,
            block_rest,
        })
}

fn arb_template() -> impl Strategy<Value = WorkoutTemplate> {
    prop::collection::vec(arb_block(), 1..4)
        .prop_map(|blocks| WorkoutTemplate::new("Prop", blocks))
}

proptest! {
    #[test]
    fn linearize_is_deterministic(template in arb_template()) {
        let lookup = common::exercises();
        prop_assert_eq!(linearize(&template, &lookup), linearize(&template, &lookup));
    }

    #[test]
    fn ids_match_positions_and_end_on_completion(template in arb_template()) {
        let steps = linearize(&template, &common::exercises());
        for (i, step) in steps.iter().enumerate() {
            prop_assert_eq!(step.id, i);
        }
        prop_assert_eq!(steps.last().map(|s| s.step_type()), Some(StepType::WorkoutComplete));
        let completions = steps
            .iter()
            .filter(|s| s.step_type() == StepType::WorkoutComplete)
            .count();
        prop_assert_eq!(completions, 1);
    }

    #[test]
    fn step_counts_follow_block_shape(template in arb_template()) {
        let steps = linearize(&template, &common::exercises());
        let count = |t: StepType| steps.iter().filter(|s| s.step_type() == t).count();

        let work: usize = template
            .blocks
            .iter()
            .map(|b| b.rounds as usize * b.drills.len())
            .sum();
        let last = template.blocks.len() - 1;
        let block_rests = template.blocks[..last]
            .iter()
            .filter(|b| b.block_rest > 0)
            .count();

        prop_assert_eq!(count(StepType::BlockStart), template.blocks.len());
        prop_assert_eq!(count(StepType::Work), work);
        // Every interval but the last in each block is followed by a rest.
        prop_assert_eq!(count(StepType::Rest), work - template.blocks.len());
        prop_assert_eq!(count(StepType::BlockRest), block_rests);
    }

    #[test]
    fn block_rest_only_sits_before_a_block_marker(template in arb_template()) {
        let steps = linearize(&template, &common::exercises());
        for pair in steps.windows(2) {
            if pair[0].step_type() == StepType::BlockRest {
                prop_assert_eq!(pair[1].step_type(), StepType::BlockStart);
            }
            if pair[0].step_type() == StepType::Rest {
                prop_assert_eq!(pair[1].step_type(), StepType::Work);
            }
        }
    }

    #[test]
    fn total_duration_is_sum_of_intervals(template in arb_template()) {
        let steps = linearize(&template, &common::exercises());
        let expected: u64 = template
            .blocks
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let intervals = u64::from(b.rounds) * b.drills.len() as u64;
                let mut secs = intervals * u64::from(b.work_sec)
                    + (intervals - 1) * u64::from(b.rest_sec);
                if i + 1 < template.blocks.len() {
                    secs += u64::from(b.block_rest);
                }
                secs
            })
            .sum();
        prop_assert_eq!(calculate_total_duration(&steps), expected);
        prop_assert_eq!(calculate_elapsed_time(&steps, steps.len()), expected);
    }

    #[test]
    fn summary_estimate_matches_timeline(template in arb_template()) {
        let steps = linearize(&template, &common::exercises());
        prop_assert_eq!(
            workout_summary(&template).estimated_duration,
            calculate_total_duration(&steps)
        );
    }

    #[test]
    fn rest_previews_the_following_work(template in arb_template()) {
        let steps = linearize(&template, &common::exercises());
        for pair in steps.windows(2) {
            if let (StepKind::Rest(rest), StepKind::Work(work)) = (&pair[0].kind, &pair[1].kind) {
                prop_assert_eq!(&rest.next_exercise_id, &work.exercise_id);
                prop_assert_eq!(&rest.next_exercise, &work.exercise_name);
            }
        }
    }
}
