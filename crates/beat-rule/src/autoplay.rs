//! Perfect-play input synthesis.

use beat_model::{Column, NoteChart};

use crate::input::InputSample;

/// Pre-computed press for one note.
#[derive(Debug, Clone, Copy)]
struct AutoPress {
    press_us: i64,
    release_us: i64,
}

#[derive(Debug, Clone, Default)]
struct AutoColumn {
    presses: Vec<AutoPress>,
    next: usize,
    release_us: Option<i64>,
    level: i8,
}

impl AutoColumn {
    /// Level of the column at `time_us`. At most one new press per call, so
    /// every note gets its own press edge.
    fn level_at(&mut self, time_us: i64) -> i8 {
        if let Some(press) = self.presses.get(self.next)
            && press.press_us <= time_us
        {
            // Flip direction while still down so the next press is a new edge
            self.level = if self.level > 0 { -1 } else { 1 };
            self.release_us = Some(press.release_us);
            self.next += 1;
        } else if self.release_us.is_some_and(|release| release <= time_us) {
            self.level = 0;
            self.release_us = None;
        }
        self.level
    }
}

/// Generates column input that hits every note of a chart on time.
///
/// Each note is pressed at its time and released at its end (long notes)
/// or after [`Autoplay::MIN_PRESS_US`].
#[derive(Debug, Clone)]
pub struct Autoplay {
    columns: [AutoColumn; Column::COUNT],
}

impl Autoplay {
    /// Press duration for regular notes.
    pub const MIN_PRESS_US: i64 = 80_000;

    pub fn new(chart: &NoteChart) -> Self {
        let columns = std::array::from_fn(|i| {
            let column = Column::ALL[i];
            let presses = chart
                .column_notes(column)
                .iter()
                .map(|note| AutoPress {
                    press_us: note.time_us,
                    release_us: note
                        .end_time_us
                        .unwrap_or(note.time_us + Self::MIN_PRESS_US),
                })
                .collect();
            AutoColumn {
                presses,
                ..Default::default()
            }
        });
        Self { columns }
    }

    /// Column levels at `time_us`. Calls must use non-decreasing times.
    pub fn levels(&mut self, time_us: i64) -> [i8; Column::COUNT] {
        std::array::from_fn(|i| self.columns[i].level_at(time_us))
    }

    /// Replace the column part of `sample` with autoplay levels.
    pub fn apply(&mut self, time_us: i64, sample: &mut InputSample) {
        sample.columns = self.levels(time_us);
    }
}
