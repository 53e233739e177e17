use serde::{Deserialize, Serialize};

use crate::judgment::Judgment;

/// Number of judgments per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JudgmentCounts {
    pub meticulous: u32,
    pub precise: u32,
    pub good: u32,
    pub offbeat: u32,
    pub missed: u32,
}

impl JudgmentCounts {
    pub fn get(&self, judgment: Judgment) -> u32 {
        match judgment {
            Judgment::Meticulous => self.meticulous,
            Judgment::Precise => self.precise,
            Judgment::Good => self.good,
            Judgment::Offbeat => self.offbeat,
            Judgment::Missed => self.missed,
        }
    }

    pub fn increment(&mut self, judgment: Judgment) {
        let slot = match judgment {
            Judgment::Meticulous => &mut self.meticulous,
            Judgment::Precise => &mut self.precise,
            Judgment::Good => &mut self.good,
            Judgment::Offbeat => &mut self.offbeat,
            Judgment::Missed => &mut self.missed,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        self.meticulous + self.precise + self.good + self.offbeat + self.missed
    }
}

/// Final outcome of one play, read by score submission once finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    pub score: u32,
    pub max_combo: u32,
    pub total_combo: u32,
    pub accuracy: f64,
    pub counts: JudgmentCounts,
    pub early: u32,
    pub late: u32,
    /// Mean press delta in microseconds, `None` when nothing was pressed.
    pub mean_delta_us: Option<f64>,
    /// Spread of press deltas around the mean.
    pub delta_std_dev_us: Option<f64>,
}

impl PlayResult {
    /// Every judgment landed on the best tier.
    pub fn is_all_meticulous(&self) -> bool {
        self.total_combo > 0 && self.counts.meticulous == self.total_combo
    }

    /// Nothing was missed and every judgment was made.
    pub fn is_full_combo(&self) -> bool {
        self.total_combo > 0 && self.max_combo == self.total_combo
    }
}
