use crate::judgment::Judgment;
use crate::result::{JudgmentCounts, PlayResult};

/// Running score, combo and timing statistics for one player.
///
/// `record_judgment` is called once per judgment event (twice for a long
/// note). `handle_delta` is called once per attributed press only, so
/// releases and passive misses never reach the timing analytics.
#[derive(Debug, Clone, Default)]
pub struct PlayerStats {
    total_combo: u32,
    combo: u32,
    max_combo: u32,
    num_judgments: u32,
    counts: JudgmentCounts,
    weight_sum: f64,
    poor: bool,
    deltas_us: Vec<i64>,
    early: u32,
    late: u32,
}

impl PlayerStats {
    /// Deltas within this many microseconds count as neither early nor late.
    pub const EXACT_THRESHOLD_US: i64 = 1_000;

    /// Score awarded for judgment weights at a perfect run.
    pub const ACCURACY_SCORE: f64 = 500_000.0;

    /// Score awarded for a full combo.
    pub const COMBO_SCORE: f64 = 55_555.0;

    pub fn new(total_combo: u32) -> Self {
        Self {
            total_combo,
            ..Default::default()
        }
    }

    /// Record the timing of an attributed press (`press_time - note_time`).
    pub fn handle_delta(&mut self, delta_us: i64) {
        self.deltas_us.push(delta_us);
        if delta_us < -Self::EXACT_THRESHOLD_US {
            self.early += 1;
        } else if delta_us > Self::EXACT_THRESHOLD_US {
            self.late += 1;
        }
    }

    pub fn record_judgment(&mut self, judgment: Judgment) {
        self.counts.increment(judgment);
        self.num_judgments += 1;
        self.weight_sum += judgment.weight();
        if judgment.is_miss() {
            self.combo = 0;
        } else {
            self.combo += 1;
        }
        self.max_combo = self.max_combo.max(self.combo);
        self.poor = judgment.is_miss() || judgment.is_worst_hit();
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn total_combo(&self) -> u32 {
        self.total_combo
    }

    pub fn num_judgments(&self) -> u32 {
        self.num_judgments
    }

    pub fn counts(&self) -> &JudgmentCounts {
        &self.counts
    }

    pub fn count(&self, judgment: Judgment) -> u32 {
        self.counts.get(judgment)
    }

    /// Whether the most recent judgment was a poor one (worst hit or miss).
    pub fn poor(&self) -> bool {
        self.poor
    }

    pub fn deltas_us(&self) -> &[i64] {
        &self.deltas_us
    }

    pub fn early(&self) -> u32 {
        self.early
    }

    pub fn late(&self) -> u32 {
        self.late
    }

    pub fn score(&self) -> u32 {
        if self.total_combo == 0 {
            return 0;
        }
        let total = self.total_combo as f64;
        let score = Self::ACCURACY_SCORE * self.weight_sum / total
            + Self::COMBO_SCORE * self.max_combo as f64 / total;
        score.floor() as u32
    }

    /// Average judgment weight so far, in `0.0..=1.0`.
    pub fn accuracy(&self) -> f64 {
        if self.num_judgments == 0 {
            return 0.0;
        }
        self.weight_sum / self.num_judgments as f64
    }

    pub fn mean_delta_us(&self) -> Option<f64> {
        if self.deltas_us.is_empty() {
            return None;
        }
        let sum: i64 = self.deltas_us.iter().sum();
        Some(sum as f64 / self.deltas_us.len() as f64)
    }

    /// Population standard deviation of press deltas.
    pub fn delta_std_dev_us(&self) -> Option<f64> {
        let mean = self.mean_delta_us()?;
        let variance = self
            .deltas_us
            .iter()
            .map(|&d| {
                let diff = d as f64 - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.deltas_us.len() as f64;
        Some(variance.sqrt())
    }

    pub fn result(&self) -> PlayResult {
        PlayResult {
            score: self.score(),
            max_combo: self.max_combo,
            total_combo: self.total_combo,
            accuracy: self.accuracy(),
            counts: self.counts,
            early: self.early,
            late: self.late,
            mean_delta_us: self.mean_delta_us(),
            delta_std_dev_us: self.delta_std_dev_us(),
        }
    }
}
