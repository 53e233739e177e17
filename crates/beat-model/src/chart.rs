use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::ChartError;
use crate::note::{Note, NoteId};

/// Validated, immutable note sequence for one player.
///
/// Notes are grouped per column and kept in the order they were given,
/// which must already be time-ordered within each column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Note>", into = "Vec<Note>")]
pub struct NoteChart {
    notes: Vec<Note>,
    columns: Vec<Vec<Note>>,
    /// note id -> (column, index within column)
    index: HashMap<NoteId, (Column, usize)>,
}

impl NoteChart {
    /// Latest time a note may start or end at (24 hours).
    pub const MAX_TIME_US: i64 = 86_400_000_000;

    /// Validate a note list and build the per-column view.
    pub fn new(notes: Vec<Note>) -> Result<Self, ChartError> {
        let mut columns: Vec<Vec<Note>> = vec![Vec::new(); Column::COUNT];
        let mut index = HashMap::with_capacity(notes.len());

        for note in &notes {
            if note.time_us < 0 {
                return Err(ChartError::NegativeTime {
                    id: note.id,
                    time_us: note.time_us,
                });
            }
            if note.last_time_us() > Self::MAX_TIME_US {
                return Err(ChartError::TimeOutOfRange {
                    id: note.id,
                    time_us: note.last_time_us(),
                });
            }
            if let Some(end_time_us) = note.end_time_us
                && end_time_us <= note.time_us
            {
                return Err(ChartError::InvalidLongNote {
                    id: note.id,
                    time_us: note.time_us,
                    end_time_us,
                });
            }

            let lane = &mut columns[note.column.index()];
            if let Some(previous) = lane.last() {
                if note.time_us <= previous.time_us {
                    return Err(ChartError::OutOfOrder {
                        id: note.id,
                        previous: previous.id,
                        column: note.column,
                    });
                }
                // A long note end may touch the next start, but not overlap it
                if note.time_us < previous.last_time_us() {
                    return Err(ChartError::Overlap {
                        id: note.id,
                        previous: previous.id,
                        column: note.column,
                    });
                }
            }

            match index.entry(note.id) {
                Entry::Occupied(_) => return Err(ChartError::DuplicateNoteId(note.id)),
                Entry::Vacant(slot) => {
                    slot.insert((note.column, lane.len()));
                }
            }
            lane.push(*note);
        }

        Ok(Self {
            notes,
            columns,
            index,
        })
    }

    /// Decode a JSON array of notes and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, ChartError> {
        let notes: Vec<Note> = serde_json::from_str(json)?;
        Self::new(notes)
    }

    /// All notes in the order they were given.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Notes of one column, time-ordered.
    pub fn column_notes(&self, column: Column) -> &[Note] {
        &self.columns[column.index()]
    }

    pub fn note(&self, id: NoteId) -> Option<&Note> {
        self.locate(id)
            .map(|(column, i)| &self.columns[column.index()][i])
    }

    /// Column and position within that column of a note.
    pub fn locate(&self, id: NoteId) -> Option<(Column, usize)> {
        self.index.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Number of judgment events the whole chart produces
    /// (1 per regular note, 2 per long note).
    pub fn total_combo(&self) -> u32 {
        self.notes.iter().map(Note::judgment_count).sum()
    }

    /// Latest relevant timestamp (long note ends included), or `None` when empty.
    pub fn last_time_us(&self) -> Option<i64> {
        self.notes.iter().map(Note::last_time_us).max()
    }
}

impl TryFrom<Vec<Note>> for NoteChart {
    type Error = ChartError;

    fn try_from(notes: Vec<Note>) -> Result<Self, Self::Error> {
        Self::new(notes)
    }
}

impl From<NoteChart> for Vec<Note> {
    fn from(chart: NoteChart) -> Self {
        chart.notes
    }
}
