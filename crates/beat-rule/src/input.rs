use beat_model::Column;
use log::warn;
use serde::{Deserialize, Serialize};

/// Logical input channel of one player, resolved once from a host name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputChannel {
    Column(Column),
    SpeedUp,
    SpeedDown,
    /// Fine-grain modifier for speed changes. Shared by all players.
    Select,
    Pinch,
}

impl InputChannel {
    /// Resolve a host channel name such as `p1_1`, `p1_SC`, `p1_speedup`
    /// or `select` for the given player number.
    ///
    /// Channels belonging to another player resolve to `None`.
    pub fn from_name(name: &str, player: u8) -> Option<Self> {
        if name == "select" {
            return Some(InputChannel::Select);
        }
        let rest = name.strip_prefix('p')?;
        let (number, suffix) = rest.split_once('_')?;
        if number.parse::<u8>().ok()? != player {
            return None;
        }
        match suffix {
            "speedup" => Some(InputChannel::SpeedUp),
            "speeddown" => Some(InputChannel::SpeedDown),
            "pinch" => Some(InputChannel::Pinch),
            other => Column::from_channel_name(other).map(InputChannel::Column),
        }
    }
}

/// Raw input of one player for one tick.
///
/// Column levels are `0` when idle and `1` or `-1` when down; the sign
/// carries the turntable direction for the scratch column.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InputSample {
    pub columns: [i8; Column::COUNT],
    pub speed_up: bool,
    pub speed_down: bool,
    pub select: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinch: Option<f64>,
}

impl InputSample {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sample from `(channel name, value)` pairs. Unknown names and
    /// channels of other players are ignored.
    pub fn from_channels<'a, I>(channels: I, player: u8) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut sample = Self::default();
        for (name, value) in channels {
            if let Some(channel) = InputChannel::from_name(name, player) {
                sample.set(channel, value);
            }
        }
        sample
    }

    /// Set one channel from a host value.
    pub fn set(&mut self, channel: InputChannel, value: f64) {
        match channel {
            InputChannel::Column(column) => self.columns[column.index()] = level_of(value),
            InputChannel::SpeedUp => self.speed_up = level_of(value) != 0,
            InputChannel::SpeedDown => self.speed_down = level_of(value) != 0,
            InputChannel::Select => self.select = level_of(value) != 0,
            InputChannel::Pinch => self.pinch = Some(value),
        }
    }

    pub fn level(&self, column: Column) -> i8 {
        self.columns[column.index()]
    }

    pub fn with_level(mut self, column: Column, level: i8) -> Self {
        self.columns[column.index()] = level.signum();
        self
    }

    /// Hold a column down.
    pub fn pressing(self, column: Column) -> Self {
        self.with_level(column, 1)
    }

    pub fn with_speed_up(mut self) -> Self {
        self.speed_up = true;
        self
    }

    pub fn with_speed_down(mut self) -> Self {
        self.speed_down = true;
        self
    }

    pub fn with_select(mut self) -> Self {
        self.select = true;
        self
    }

    pub fn with_pinch(mut self, magnitude: f64) -> Self {
        self.pinch = Some(magnitude);
        self
    }
}

fn level_of(value: f64) -> i8 {
    if value.is_nan() {
        warn!("ignoring NaN input value");
        0
    } else if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Discrete per-column signal derived from two consecutive levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ButtonSignal {
    #[default]
    Idle,
    Pressed,
    Held,
    Released,
}

impl ButtonSignal {
    /// Classify the transition from `previous` to `current` level.
    ///
    /// A change between two non-zero levels (scratch direction change) is a
    /// new press.
    pub fn from_levels(previous: i8, current: i8) -> Self {
        match (previous, current) {
            (0, 0) => ButtonSignal::Idle,
            (0, _) => ButtonSignal::Pressed,
            (_, 0) => ButtonSignal::Released,
            (p, c) if p != c => ButtonSignal::Pressed,
            _ => ButtonSignal::Held,
        }
    }

    pub fn is_down(self) -> bool {
        matches!(self, ButtonSignal::Pressed | ButtonSignal::Held)
    }
}

/// Non-column controls for one tick, with press edges already detected.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlSignals {
    pub speed_up: bool,
    pub speed_down: bool,
    /// Level, not an edge
    pub select: bool,
    pub pinch: Option<f64>,
}

/// Signals of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputSignals {
    pub columns: [ButtonSignal; Column::COUNT],
    pub controls: ControlSignals,
}

impl InputSignals {
    pub fn column(&self, column: Column) -> ButtonSignal {
        self.columns[column.index()]
    }
}

/// Remembers the previous sample so press/release edges can be derived.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    previous: InputSample,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, sample: &InputSample) -> InputSignals {
        let previous = &self.previous;
        let columns = std::array::from_fn(|i| {
            ButtonSignal::from_levels(previous.columns[i], sample.columns[i])
        });
        let controls = ControlSignals {
            speed_up: sample.speed_up && !previous.speed_up,
            speed_down: sample.speed_down && !previous.speed_down,
            select: sample.select,
            pinch: sample.pinch,
        };
        self.previous = *sample;
        InputSignals { columns, controls }
    }
}
