//! Deterministic re-run of input logs and autoplay log generation.

use beat_model::NoteChart;
use beat_rule::{
    Autoplay, InputSample, JudgmentNotification, PlayResult, PlayerError, PlayerOptions,
    PlayerState,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::input_log::InputLog;

/// A judgment together with the tick it happened on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimedJudgment {
    pub time_us: i64,
    #[serde(flatten)]
    pub notification: JudgmentNotification,
}

/// Everything a replay run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    pub result: PlayResult,
    pub judgments: Vec<TimedJudgment>,
    pub end_time_us: i64,
}

/// Play every frame of `log` on a fresh player, then run one more empty
/// tick past the finish time so every note is judged.
pub fn run_replay(
    chart: &NoteChart,
    options: &PlayerOptions,
    log: &InputLog,
) -> Result<ReplayOutcome, PlayerError> {
    if log.player != options.player {
        warn!(
            "input log was recorded for player {}, replaying as player {}",
            log.player, options.player
        );
    }
    let mut state = PlayerState::new(chart, options)?;
    let mut judgments = Vec::new();
    let mut time_us = 0;

    for frame in log.frames() {
        time_us = frame.time_us;
        state.update(time_us, &frame.sample);
        collect(&state, time_us, &mut judgments);
    }
    if !state.is_finished() {
        time_us = time_us.max(state.finish_time_us() + 1);
        state.update(time_us, &InputSample::new());
        collect(&state, time_us, &mut judgments);
    }
    debug!(
        "replayed {} frames, {} judgments, ended at {} us",
        log.len(),
        judgments.len(),
        time_us
    );

    Ok(ReplayOutcome {
        result: state.result(),
        judgments,
        end_time_us: time_us,
    })
}

fn collect(state: &PlayerState, time_us: i64, judgments: &mut Vec<TimedJudgment>) {
    judgments.extend(
        state
            .notifications()
            .judgments
            .iter()
            .map(|&notification| TimedJudgment {
                time_us,
                notification,
            }),
    );
}

/// Perfect-play input log sampled every `tick_us`, from time zero until the
/// player would be finished.
pub fn autoplay_log(
    chart: &NoteChart,
    options: &PlayerOptions,
    tick_us: i64,
) -> Result<InputLog, PlayerError> {
    options.validate()?;
    let mut autoplay = Autoplay::new(chart);
    let mut log = InputLog::new(options.player);
    let end_us = chart.last_time_us().unwrap_or(0) + options.finish_grace_us;
    let step = tick_us.max(1);

    let mut time_us = 0;
    while time_us <= end_us {
        let mut sample = InputSample::new();
        autoplay.apply(time_us, &mut sample);
        log.push(time_us, sample);
        time_us += step;
    }
    Ok(log)
}
