use beat_rule::{InputSample, PlayerState};

use crate::input_log::InputLog;

/// Feeds a player and keeps every frame it was given.
#[derive(Debug)]
pub struct ReplayRecorder {
    log: InputLog,
}

impl ReplayRecorder {
    pub fn new(player: u8) -> Self {
        Self {
            log: InputLog::new(player),
        }
    }

    /// Record one tick without playing it.
    pub fn record(&mut self, time_us: i64, sample: &InputSample) {
        self.log.push(time_us, *sample);
    }

    /// Record one tick and play it on `state`.
    pub fn update(&mut self, state: &mut PlayerState, time_us: i64, sample: &InputSample) {
        self.record(time_us, sample);
        state.update(time_us, sample);
    }

    pub fn log(&self) -> &InputLog {
        &self.log
    }

    pub fn into_log(self) -> InputLog {
        self.log
    }
}
