use serde::{Deserialize, Serialize};

use crate::error::PlayerError;
use crate::judgment::Timegates;

/// Per-player play configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerOptions {
    /// Player number used to resolve input channel names (`p1_*`).
    #[serde(default = "default_player")]
    pub player: u8,
    /// Initial scroll speed.
    #[serde(default = "default_speed")]
    pub speed: f64,
    #[serde(default = "default_min_speed")]
    pub min_speed: f64,
    #[serde(default = "default_max_speed")]
    pub max_speed: f64,
    /// Timing window scale in percent (100 = normal).
    #[serde(default = "default_judge_window_rate")]
    pub judge_window_rate: u32,
    /// Time after the last note before play is finished, in microseconds.
    #[serde(default = "default_finish_grace_us")]
    pub finish_grace_us: i64,
    /// Replace column input with perfect play.
    #[serde(default)]
    pub autoplay: bool,
}

fn default_player() -> u8 {
    1
}

fn default_speed() -> f64 {
    1.0
}

fn default_min_speed() -> f64 {
    0.5
}

fn default_max_speed() -> f64 {
    10.0
}

fn default_judge_window_rate() -> u32 {
    100
}

fn default_finish_grace_us() -> i64 {
    5_000_000
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            player: default_player(),
            speed: default_speed(),
            min_speed: default_min_speed(),
            max_speed: default_max_speed(),
            judge_window_rate: default_judge_window_rate(),
            finish_grace_us: default_finish_grace_us(),
            autoplay: false,
        }
    }
}

impl PlayerOptions {
    pub const MAX_JUDGE_WINDOW_RATE: u32 = 400;

    /// Longest accepted finish grace (one hour).
    pub const MAX_FINISH_GRACE_US: i64 = 3_600_000_000;

    pub fn from_json_str(json: &str) -> Result<Self, PlayerError> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| PlayerError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn validate(&self) -> Result<(), PlayerError> {
        let invalid = |message: String| -> Result<(), PlayerError> {
            Err(PlayerError::InvalidOptions(message))
        };

        if self.player == 0 {
            return invalid("player number must start at 1".to_string());
        }
        for (name, value) in [("minSpeed", self.min_speed), ("maxSpeed", self.max_speed)] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        if self.min_speed > self.max_speed {
            return invalid(format!(
                "minSpeed {} is above maxSpeed {}",
                self.min_speed, self.max_speed
            ));
        }
        if !(self.min_speed..=self.max_speed).contains(&self.speed) {
            return invalid(format!(
                "speed {} is outside {}..={}",
                self.speed, self.min_speed, self.max_speed
            ));
        }
        if self.judge_window_rate == 0 || self.judge_window_rate > Self::MAX_JUDGE_WINDOW_RATE {
            return invalid(format!(
                "judgeWindowRate must be within 1..={}, got {}",
                Self::MAX_JUDGE_WINDOW_RATE,
                self.judge_window_rate
            ));
        }
        if !(0..=Self::MAX_FINISH_GRACE_US).contains(&self.finish_grace_us) {
            return invalid(format!(
                "finishGraceUs must be within 0..={}, got {}",
                Self::MAX_FINISH_GRACE_US,
                self.finish_grace_us
            ));
        }
        Ok(())
    }

    pub fn timegates(&self) -> Timegates {
        Timegates::scaled(self.judge_window_rate)
    }
}
