use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// BPM change event at a beat position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BpmChange {
    /// Beat position (quarter notes from chart start)
    pub beat: f64,
    /// New BPM value
    pub bpm: f64,
}

/// Maps chart-relative positions (beats, measures) to absolute time.
///
/// Measures are 4/4. Times are accumulated in floating point per BPM
/// segment and rounded to whole microseconds once at the end, so the
/// same position always yields the same time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    initial_bpm: f64,
    bpm_changes: Vec<BpmChange>,
}

impl Timeline {
    pub const BEATS_PER_MEASURE: f64 = 4.0;

    pub fn new(initial_bpm: f64) -> Result<Self, ChartError> {
        validate_bpm(initial_bpm)?;
        Ok(Self {
            initial_bpm,
            bpm_changes: Vec::new(),
        })
    }

    /// Add a BPM change. Changes may be added in any order.
    pub fn with_bpm_change(mut self, beat: f64, bpm: f64) -> Result<Self, ChartError> {
        if !beat.is_finite() || beat < 0.0 || validate_bpm(bpm).is_err() {
            return Err(ChartError::InvalidBpmChange { beat, bpm });
        }
        self.bpm_changes.push(BpmChange { beat, bpm });
        self.bpm_changes.sort_by(|a, b| a.beat.total_cmp(&b.beat));
        Ok(self)
    }

    pub fn initial_bpm(&self) -> f64 {
        self.initial_bpm
    }

    pub fn bpm_changes(&self) -> &[BpmChange] {
        &self.bpm_changes
    }

    /// Absolute time in microseconds of a beat position.
    pub fn beat_to_us(&self, beat: f64) -> i64 {
        let mut time_us = 0.0;
        let mut current_beat = 0.0;
        let mut current_bpm = self.initial_bpm;

        for change in &self.bpm_changes {
            if change.beat >= beat {
                break;
            }
            time_us += beats_to_us(change.beat - current_beat, current_bpm);
            current_beat = change.beat;
            current_bpm = change.bpm;
        }

        time_us += beats_to_us(beat - current_beat, current_bpm);
        time_us.round() as i64
    }

    /// Absolute time in microseconds of a position within a measure.
    ///
    /// `fraction` is the position inside the measure, `0.0..1.0`.
    pub fn measure_to_us(&self, measure: u32, fraction: f64) -> i64 {
        self.beat_to_us((measure as f64 + fraction) * Self::BEATS_PER_MEASURE)
    }
}

fn validate_bpm(bpm: f64) -> Result<(), ChartError> {
    if bpm.is_finite() && bpm > 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidBpm(bpm))
    }
}

fn beats_to_us(beats: f64, bpm: f64) -> f64 {
    beats * 60_000_000.0 / bpm
}
