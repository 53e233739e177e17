//! Replay files and re-runs against live play.

use beat_model::{Column, Note, NoteChart};
use beat_replay::{InputLog, ReplayRecorder, autoplay_log, run_replay};
use beat_rule::{InputSample, Judgment, PlayerOptions, PlayerState};
use tempfile::TempDir;

fn chart() -> NoteChart {
    NoteChart::new(vec![
        Note::normal(0, Column::Key1, 1_000_000, 1),
        Note::normal(1, Column::Key2, 1_250_000, 2),
        Note::long_note(2, Column::Scratch, 1_500_000, 2_000_000, 3),
        Note::normal(3, Column::Key1, 2_100_000, 4),
        Note::long_note(4, Column::Key4, 2_400_000, 3_000_000, 5),
    ])
    .unwrap()
}

/// A sloppy player: early on one note, late on another, lifts a hold early.
fn sloppy_input(time_us: i64) -> InputSample {
    let mut sample = InputSample::new();
    if (970_000..1_050_000).contains(&time_us) {
        sample = sample.pressing(Column::Key1);
    }
    if (1_330_000..1_400_000).contains(&time_us) {
        sample = sample.pressing(Column::Key2);
    }
    if (1_500_000..2_000_000).contains(&time_us) {
        sample = sample.pressing(Column::Scratch);
    }
    if (2_420_000..2_600_000).contains(&time_us) {
        sample = sample.pressing(Column::Key4);
    }
    if (1_600_000..1_700_000).contains(&time_us) {
        sample = sample.with_speed_up();
    }
    sample
}

fn live_play(options: &PlayerOptions) -> (PlayerState, InputLog) {
    let mut state = PlayerState::new(&chart(), options).unwrap();
    let mut recorder = ReplayRecorder::new(options.player);
    let mut time_us = 0;
    while !state.is_finished() {
        recorder.update(&mut state, time_us, &sloppy_input(time_us));
        time_us += 10_000;
    }
    (state, recorder.into_log())
}

#[test]
fn test_replay_matches_live_play() {
    let options = PlayerOptions {
        finish_grace_us: 1_000_000,
        ..Default::default()
    };
    let (live, log) = live_play(&options);
    let outcome = run_replay(&chart(), &options, &log).unwrap();

    assert_eq!(outcome.result, live.result());
    assert_eq!(outcome.result.counts.missed, 2);
    assert_eq!(outcome.result.counts.meticulous, 3);
    assert_eq!(outcome.result.counts.precise, 1);
    assert_eq!(outcome.result.counts.good, 1);
}

#[test]
fn test_replay_is_repeatable() {
    let options = PlayerOptions::default();
    let (_, log) = live_play(&options);
    let first = run_replay(&chart(), &options, &log).unwrap();
    let second = run_replay(&chart(), &options, &log).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_log_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let (_, log) = live_play(&PlayerOptions::default());

    let plain = dir.path().join("play.json");
    log.write(&plain).unwrap();
    assert_eq!(InputLog::read(&plain).unwrap(), log);

    let compressed = dir.path().join("play.json.gz");
    log.write(&compressed).unwrap();
    assert_eq!(InputLog::read(&compressed).unwrap(), log);

    let plain_size = std::fs::metadata(&plain).unwrap().len();
    let compressed_size = std::fs::metadata(&compressed).unwrap().len();
    assert!(compressed_size < plain_size);
}

#[test]
fn test_read_rejects_bad_files() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.json");
    assert!(InputLog::read(&missing).is_err());

    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "not json").unwrap();
    assert!(InputLog::read(&garbage).is_err());

    let backwards = dir.path().join("backwards.json");
    std::fs::write(
        &backwards,
        r#"{"player":1,"frames":[{"timeUs":10,"sample":{}},{"timeUs":5,"sample":{}}]}"#,
    )
    .unwrap();
    let err = InputLog::read(&backwards).unwrap_err();
    assert!(format!("{err:#}").contains("earlier"));
}

#[test]
fn test_autoplay_log_plays_perfectly() {
    let options = PlayerOptions::default();
    let log = autoplay_log(&chart(), &options, 16_667).unwrap();
    let outcome = run_replay(&chart(), &options, &log).unwrap();

    assert_eq!(outcome.result.counts.meticulous, outcome.result.total_combo);
    assert_eq!(outcome.result.max_combo, 7);
    assert!(outcome.result.is_all_meticulous());
    assert_eq!(outcome.judgments.len(), 7);
    assert!(outcome.judgments.iter().all(|j| j.notification.judgment == Judgment::Meticulous));
}

#[test]
fn test_autoplay_option_matches_autoplay_log() {
    let options = PlayerOptions::default();
    let log = autoplay_log(&chart(), &options, 16_667).unwrap();
    let from_log = run_replay(&chart(), &options, &log).unwrap();

    let empty: InputLog = InputLog {
        player: 1,
        frames: log
            .frames()
            .iter()
            .map(|frame| beat_replay::InputFrame {
                time_us: frame.time_us,
                sample: InputSample::new(),
            })
            .collect(),
    };
    let with_option = run_replay(&chart(), &options.clone().with_autoplay(true), &empty).unwrap();
    assert_eq!(from_log, with_option);
}
