use serde::{Deserialize, Serialize};

/// Timing accuracy classification, ordered from best to worst.
///
/// `Missed` is the reserved miss value and is strictly worse than every hit
/// tier. `value()` gives the numeric tier used by result screens
/// (1..=4 for hits, -1 for a miss).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Judgment {
    Meticulous,
    Precise,
    Good,
    Offbeat,
    Missed,
}

impl Judgment {
    /// Number of judgment kinds, including the miss.
    pub const COUNT: usize = 5;

    /// Hit tiers in window order (smallest window first).
    pub const HIT_TIERS: [Judgment; 4] = [
        Judgment::Meticulous,
        Judgment::Precise,
        Judgment::Good,
        Judgment::Offbeat,
    ];

    pub const ALL: [Judgment; Self::COUNT] = [
        Judgment::Meticulous,
        Judgment::Precise,
        Judgment::Good,
        Judgment::Offbeat,
        Judgment::Missed,
    ];

    pub fn value(self) -> i8 {
        match self {
            Judgment::Meticulous => 1,
            Judgment::Precise => 2,
            Judgment::Good => 3,
            Judgment::Offbeat => 4,
            Judgment::Missed => -1,
        }
    }

    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            1 => Some(Judgment::Meticulous),
            2 => Some(Judgment::Precise),
            3 => Some(Judgment::Good),
            4 => Some(Judgment::Offbeat),
            -1 => Some(Judgment::Missed),
            _ => None,
        }
    }

    /// Index into per-judgment count tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_miss(self) -> bool {
        self == Judgment::Missed
    }

    /// The worst tier that still counts as a hit.
    pub fn is_worst_hit(self) -> bool {
        self == Judgment::Offbeat
    }

    /// Contribution of one judgment to score and accuracy.
    pub fn weight(self) -> f64 {
        match self {
            Judgment::Meticulous => 1.0,
            Judgment::Precise => 0.8,
            Judgment::Good => 0.5,
            Judgment::Offbeat | Judgment::Missed => 0.0,
        }
    }
}

/// Timing windows in microseconds, one per hit tier, ascending.
///
/// Boundaries are inclusive: `|delta| <= window` falls into that tier.
/// A long note release inside `release_window` keeps the head tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timegates {
    windows: [i64; 4],
    release_window: i64,
}

impl Timegates {
    /// Press windows for [Meticulous, Precise, Good, Offbeat].
    pub const NORMAL_WINDOWS: [i64; 4] = [20_000, 50_000, 100_000, 200_000];

    /// Release window for long note ends.
    pub const NORMAL_RELEASE_WINDOW: i64 = 200_000;

    pub fn normal() -> Self {
        Self {
            windows: Self::NORMAL_WINDOWS,
            release_window: Self::NORMAL_RELEASE_WINDOW,
        }
    }

    /// Normal windows scaled by `rate` percent (100 = normal).
    pub fn scaled(rate: u32) -> Self {
        let scale = |w: i64| w * rate as i64 / 100;
        Self {
            windows: Self::NORMAL_WINDOWS.map(scale),
            release_window: scale(Self::NORMAL_RELEASE_WINDOW),
        }
    }

    pub fn windows(&self) -> &[i64; 4] {
        &self.windows
    }

    /// Widest press window; anything beyond it is out of range.
    pub fn widest(&self) -> i64 {
        self.windows[self.windows.len() - 1]
    }

    /// Largest distance from a long note end that still keeps the head tier.
    pub fn release_window(&self) -> i64 {
        self.release_window
    }

    /// Classify a press delta (`press_time - note_time`).
    pub fn judge(&self, delta_us: i64) -> Judgment {
        let gap = delta_us.abs();
        self.windows
            .iter()
            .position(|&window| gap <= window)
            .map_or(Judgment::Missed, |i| Judgment::HIT_TIERS[i])
    }

    /// Whether a release delta (`release_time - end_time`) is acceptable.
    pub fn release_in_range(&self, delta_us: i64) -> bool {
        delta_us.abs() <= self.release_window()
    }
}

impl Default for Timegates {
    fn default() -> Self {
        Self::normal()
    }
}
