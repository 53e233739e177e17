//! Properties that must hold for any input stream.

use beat_model::{Column, Note, NoteChart, NoteId};
use beat_rule::{InputSample, Judgment, Notifications, NoteStatus, PlayerOptions, PlayerState};
use proptest::prelude::*;

fn chart() -> NoteChart {
    NoteChart::new(vec![
        Note::normal(0, Column::Key1, 500_000, 1),
        Note::normal(1, Column::Key2, 600_000, 2),
        Note::long_note(2, Column::Scratch, 700_000, 1_200_000, 3),
        Note::normal(3, Column::Key1, 750_000, 4),
        Note::long_note(4, Column::Key3, 900_000, 1_400_000, 5),
        Note::normal(5, Column::Key1, 1_000_000, 6),
        Note::long_note(6, Column::Scratch, 1_200_000, 1_600_000, 7),
        Note::normal(7, Column::Key7, 1_500_000, 8),
    ])
    .unwrap()
}

fn options() -> PlayerOptions {
    PlayerOptions {
        finish_grace_us: 500_000,
        ..Default::default()
    }
}

/// One tick: time step and which columns are down.
fn frame() -> impl Strategy<Value = (i64, [i8; Column::COUNT])> {
    (1i64..40_000, prop::array::uniform8(-1i8..=1))
}

fn run(frames: &[(i64, [i8; Column::COUNT])]) -> (PlayerState, Vec<Notifications>) {
    let mut state = PlayerState::new(&chart(), &options()).unwrap();
    let mut log = Vec::with_capacity(frames.len());
    let mut time_us = 0;
    for &(step, columns) in frames {
        time_us += step;
        let sample = InputSample {
            columns,
            ..Default::default()
        };
        state.update(time_us, &sample);
        log.push(state.notifications().clone());
    }
    (state, log)
}

fn rank(status: NoteStatus) -> u8 {
    match status {
        NoteStatus::Unjudged => 0,
        NoteStatus::Active => 1,
        NoteStatus::Judged => 2,
    }
}

proptest! {
    #[test]
    fn same_input_same_outcome(frames in prop::collection::vec(frame(), 1..200)) {
        let (first, first_log) = run(&frames);
        let (second, second_log) = run(&frames);
        prop_assert_eq!(first_log, second_log);
        prop_assert_eq!(first.result(), second.result());
        prop_assert_eq!(first.stats().deltas_us(), second.stats().deltas_us());
    }

    #[test]
    fn status_only_moves_forward(frames in prop::collection::vec(frame(), 1..200)) {
        let chart = chart();
        let mut state = PlayerState::new(&chart, &options()).unwrap();
        let mut previous: Vec<u8> = vec![0; chart.len()];
        let mut time_us = 0;
        for (step, columns) in frames {
            time_us += step;
            state.update(time_us, &InputSample { columns, ..Default::default() });
            for (i, note) in chart.notes().iter().enumerate() {
                let status = state.note_status(note.id).unwrap();
                let now = rank(status);
                prop_assert!(now >= previous[i]);
                if status == NoteStatus::Active {
                    prop_assert!(note.is_long_note());
                }
                previous[i] = now;
            }
            prop_assert!(state.stats().num_judgments() <= state.stats().total_combo());
        }
    }

    #[test]
    fn finished_play_judges_everything(frames in prop::collection::vec(frame(), 1..100)) {
        let (mut state, _) = run(&frames);
        state.update(10_000_000, &InputSample::new());
        prop_assert!(state.is_finished());
        prop_assert_eq!(state.stats().num_judgments(), state.stats().total_combo());
        for id in 0..8 {
            prop_assert_eq!(state.note_status(NoteId(id)), Some(NoteStatus::Judged));
        }
    }
}

#[test]
fn autoplay_hits_everything_on_time() {
    let options = options().with_autoplay(true);
    let mut state = PlayerState::new(&chart(), &options).unwrap();
    let mut time_us = 0;
    while !state.is_finished() {
        state.update(time_us, &InputSample::new());
        time_us += 1_000;
    }
    let result = state.result();
    assert_eq!(result.counts.meticulous, result.total_combo);
    assert_eq!(result.max_combo, result.total_combo);
    assert_eq!(state.note_judgment(NoteId(2)), Some(Judgment::Meticulous));
}
