//! Integration tests for workout playback.
//!
//! These tests drive a full session with a hand-driven clock and recording
//! hardware fakes, checking time accounting, cues, voice and wake lock
//! behaviour, and history persistence.

mod common;

use circuit_core::services::Cue;
use circuit_core::{Event, PlaybackError, PlaybackOptions, PlayerState, StepType, WorkoutTemplate};
use common::{block, harness, two_by_two};

fn voice_on() -> PlaybackOptions {
    PlaybackOptions {
        voice_enabled: true,
        ..PlaybackOptions::default()
    }
}

#[test]
fn test_full_run_credits_every_step() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    assert_eq!(h.engine.total_duration_secs(), 95);

    h.engine.start().unwrap();
    h.engine.continue_block();
    h.run(95_000, 250);

    assert_eq!(h.engine.state(), PlayerState::Completed);
    assert_eq!(h.engine.elapsed_total(), 95.0);

    let entries = h.history.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].workout_name, "Legs");
    assert_eq!(entries[0].duration, 95);
}

#[test]
fn test_cues_follow_step_types() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    assert!(h.recorder.cues().is_empty());

    h.engine.continue_block();
    h.run(95_000, 250);

    assert_eq!(h.recorder.count(Cue::WorkStart), 4);
    assert_eq!(h.recorder.count(Cue::RestStart), 3);
    assert_eq!(h.recorder.count(Cue::Complete), 1);
    // Seven timed steps, three beeps each.
    assert_eq!(h.recorder.count(Cue::CountdownBeep), 21);
}

#[test]
fn test_countdown_beeps_once_per_boundary_at_high_frame_rate() {
    let template = WorkoutTemplate::new("One", vec![block("Main", 1, &["plank"], 4, 0, 0)]);
    let mut h = harness(&template, PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();

    let events = h.run(3_992, 8);
    let seconds: Vec<u32> = events
        .iter()
        .filter_map(|e| match e {
            Event::Countdown { seconds_left, .. } => Some(*seconds_left),
            _ => None,
        })
        .collect();
    assert_eq!(seconds, vec![3, 2, 1]);
    assert_eq!(h.recorder.count(Cue::CountdownBeep), 3);
}

#[test]
fn test_countdown_range_is_configurable() {
    let template = WorkoutTemplate::new("One", vec![block("Main", 1, &["plank"], 10, 0, 0)]);
    let options = PlaybackOptions {
        countdown_from: 5,
        ..PlaybackOptions::default()
    };
    let mut h = harness(&template, options, false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    h.run(10_000, 500);
    assert_eq!(h.recorder.count(Cue::CountdownBeep), 5);
}

#[test]
fn test_skip_credits_partial_time() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();

    h.run(5_000, 250);
    h.engine.skip();
    assert_eq!(h.engine.elapsed_total(), 5.0);
    assert_eq!(h.engine.current_step().unwrap().step_type(), StepType::Rest);

    // Skipping straight away credits nothing.
    h.engine.skip();
    assert_eq!(h.engine.elapsed_total(), 5.0);
    assert_eq!(h.engine.step_index(), 3);
}

#[test]
fn test_timeout_credit_ignores_frame_overshoot() {
    // A 20s step ended by a late frame still credits exactly 20s, while a
    // skip at the same point would credit the measured time.
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();

    h.run(19_000, 1_000);
    h.clock.advance_ms(1_700);
    h.engine.tick();
    assert_eq!(h.engine.elapsed_total(), 20.0);
    assert_eq!(h.engine.step_index(), 2);
}

#[test]
fn test_pause_excludes_paused_time() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();

    h.run(10_000, 250);
    assert!(h.engine.toggle_pause().is_some());
    h.clock.advance_ms(300_000);
    assert!(h.engine.tick().is_empty());
    assert!(h.engine.toggle_pause().is_some());
    assert_eq!(h.engine.state(), PlayerState::Running);

    h.run(10_000, 250);
    assert_eq!(h.engine.step_index(), 2);
    assert_eq!(h.engine.elapsed_total(), 20.0);
}

#[test]
fn test_pause_is_ignored_on_block_marker() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    assert!(h.engine.pause().is_none());
    assert!(h.engine.resume().is_none());
    assert_eq!(h.engine.state(), PlayerState::AwaitingContinue);
}

#[test]
fn test_voice_announces_work_steps() {
    let mut h = harness(&two_by_two(), voice_on(), true);
    h.engine.start().unwrap();
    h.engine.continue_block();
    assert_eq!(h.recorder.spoken(), vec!["Squat. Sit back, chest up".to_string()]);

    // Rest steps are not announced.
    h.engine.skip();
    assert_eq!(h.recorder.spoken().len(), 1);
    h.engine.skip();
    assert_eq!(h.recorder.spoken()[1], "Lunge. Long stride");
}

#[test]
fn test_voice_respects_mute_and_preference() {
    let mut h = harness(&two_by_two(), voice_on(), true);
    h.engine.set_audio_enabled(false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    assert!(h.recorder.spoken().is_empty());

    let mut h = harness(&two_by_two(), PlaybackOptions::default(), true);
    h.engine.start().unwrap();
    h.engine.continue_block();
    assert!(h.recorder.spoken().is_empty());
}

#[test]
fn test_voice_requires_speech_support() {
    let mut h = harness(&two_by_two(), voice_on(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    assert!(h.recorder.spoken().is_empty());
}

#[test]
fn test_mute_silences_all_cues() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    assert!(!h.engine.toggle_audio());
    h.engine.continue_block();
    h.run(95_000, 250);

    assert!(h.recorder.cues().is_empty());
    assert_eq!(h.engine.state(), PlayerState::Completed);
    assert_eq!(h.history.entries().len(), 1);
}

#[test]
fn test_wake_lock_held_between_first_block_and_completion() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    assert_eq!(h.recorder.lock_requests(), 0);

    h.engine.continue_block();
    assert_eq!(h.recorder.lock_requests(), 1);
    assert_eq!(h.recorder.lock_releases(), 0);

    h.run(95_000, 250);
    assert_eq!(h.recorder.lock_releases(), 1);

    // Finishing and dropping do not release a second time.
    h.engine.finish();
    drop(h.engine);
    assert_eq!(h.recorder.lock_releases(), 1);
}

#[test]
fn test_exit_mid_workout_releases_lock_without_history() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    h.run(3_000, 250);

    let event = h.engine.exit().unwrap();
    assert!(matches!(event, Event::SessionExited { step_index: 1, .. }));
    assert_eq!(h.recorder.lock_releases(), 1);
    assert!(h.history.entries().is_empty());

    // The session is inert afterwards.
    assert!(h.run(60_000, 1_000).is_empty());
    assert!(h.engine.skip().is_empty());
    assert!(h.engine.exit().is_none());
    assert_eq!(h.engine.state(), PlayerState::Exited);
}

#[test]
fn test_exit_while_hidden_does_not_reacquire_lock() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    assert!(h.wake_lock.is_locked());

    h.wake_lock.on_visibility_change(false);
    assert_eq!(h.recorder.lock_releases(), 1);
    h.engine.exit();
    h.wake_lock.on_visibility_change(true);

    assert!(!h.wake_lock.is_locked());
    assert_eq!(h.recorder.lock_requests(), 1);
    assert_eq!(h.recorder.lock_releases(), 1);
}

#[test]
fn test_dropping_session_releases_lock() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    assert_eq!(h.recorder.lock_releases(), 0);

    let recorder = h.recorder.clone();
    drop(h);
    assert_eq!(recorder.lock_releases(), 1);
}

#[test]
fn test_restart_keeps_lock_and_replays_from_start() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    h.run(30_000, 250);
    assert!(h.engine.step_index() > 1);

    let events = h.engine.restart();
    assert!(matches!(events[0], Event::Restarted { .. }));
    assert!(matches!(
        events[1],
        Event::StepEntered {
            step_index: 0,
            step_type: StepType::BlockStart,
            ..
        }
    ));
    assert_eq!(h.engine.elapsed_total(), 0.0);
    assert_eq!(h.recorder.lock_releases(), 0);

    // Continuing again does not stack a second lock.
    h.engine.continue_block();
    assert_eq!(h.recorder.lock_requests(), 1);
}

#[test]
fn test_empty_workout_refuses_to_start() {
    let mut h = harness(
        &WorkoutTemplate::new("Nothing", Vec::new()),
        PlaybackOptions::default(),
        false,
    );
    assert_eq!(h.engine.start().unwrap_err(), PlaybackError::NoWorkoutData);
    assert!(h.engine.tick().is_empty());
    assert!(h.engine.continue_block().is_empty());
    assert_eq!(h.recorder.lock_requests(), 0);
}

#[test]
fn test_history_entry_carries_schedule_position() {
    let mut template = WorkoutTemplate::new("Short", vec![block("Main", 1, &["plank"], 2, 0, 0)]);
    template.week_key = Some("week2".into());
    template.day = Some("day1".into());

    let mut h = harness(&template, PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    let events = h.run(2_000, 500);

    let entries = h.history.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].week_key.as_deref(), Some("week2"));
    assert_eq!(entries[0].day.as_deref(), Some("day1"));

    let completed = events
        .iter()
        .find_map(|e| match e {
            Event::WorkoutCompleted { history_id, .. } => history_id.clone(),
            _ => None,
        })
        .unwrap();
    assert_eq!(completed, entries[0].id);
}

#[test]
fn test_block_rest_between_blocks() {
    let template = WorkoutTemplate::new(
        "Two Blocks",
        vec![
            block("Warmup", 1, &["squat"], 10, 5, 30),
            block("Main", 1, &["lunge"], 10, 5, 30),
        ],
    );
    let mut h = harness(&template, PlaybackOptions::default(), false);
    h.engine.start().unwrap();
    h.engine.continue_block();
    h.run(10_000, 250);

    assert_eq!(
        h.engine.current_step().unwrap().step_type(),
        StepType::BlockRest
    );
    assert_eq!(h.engine.time_remaining(), 30.0);
    assert_eq!(h.recorder.count(Cue::RestStart), 1);

    h.run(30_000, 250);
    assert_eq!(h.engine.state(), PlayerState::AwaitingContinue);
    assert!(h.engine.tick().is_empty());

    // The lock is already held, so the second marker does not request again.
    h.engine.continue_block();
    assert_eq!(h.recorder.lock_requests(), 1);
    h.run(10_000, 250);
    assert_eq!(h.engine.state(), PlayerState::Completed);
    assert_eq!(h.engine.elapsed_total(), 50.0);
}

#[test]
fn test_events_serialize_with_type_tag() {
    let mut h = harness(&two_by_two(), PlaybackOptions::default(), false);
    let events = h.engine.start().unwrap();
    let json = serde_json::to_value(&events[1]).unwrap();
    assert_eq!(json["type"], "StepEntered");
    assert_eq!(json["step_type"], "block_start");

    let snapshot = serde_json::to_value(h.engine.snapshot()).unwrap();
    assert_eq!(snapshot["type"], "StateSnapshot");
    assert_eq!(snapshot["state"], "awaiting_continue");
}
